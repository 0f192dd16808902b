//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use types::{GlyphId, Tag};

use crate::{FontData, FontRead, FontReadWithArgs, ReadArgs, ReadError};

use super::glyf::{Glyf, Glyph};

/// 'loca'
pub const TAG: Tag = Tag::new(b"loca");

/// The [loca] table.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug)]
pub enum Loca<'a> {
    /// Offsets divided by two, stored as 16-bit values.
    Short(FontData<'a>),
    Long(FontData<'a>),
}

impl<'a> Loca<'a> {
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        Self::read_with_args(data, &is_long)
    }

    /// The number of glyphs covered by the table.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => (data.len() / 2).saturating_sub(1),
            Loca::Long(data) => (data.len() / 4).saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempt to return the offset for a given glyph id.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.read_at::<u16>(idx * 2).ok().map(|x| x as u32 * 2),
            Loca::Long(data) => data.read_at::<u32>(idx * 4).ok(),
        }
    }

    /// Returns the byte range of the glyph record in the `glyf` table.
    pub fn glyph_range(&self, gid: GlyphId) -> Result<std::ops::Range<usize>, ReadError> {
        let idx = gid.to_usize();
        let start = self.get_raw(idx).ok_or(ReadError::OutOfBounds)? as usize;
        let end = self.get_raw(idx + 1).ok_or(ReadError::OutOfBounds)? as usize;
        if end < start {
            return Err(ReadError::MalformedData("loca offsets are not increasing"));
        }
        Ok(start..end)
    }

    /// Returns the glyph record for the given glyph id.
    ///
    /// Glyphs without outline data are returned as [`Glyph::Empty`].
    pub fn get_glyf(&self, gid: GlyphId, glyf: &Glyf<'a>) -> Result<Glyph<'a>, ReadError> {
        let range = self.glyph_range(gid)?;
        if range.is_empty() {
            return Ok(Glyph::Empty);
        }
        let data = glyf.data().slice(range).ok_or(ReadError::OutOfBounds)?;
        Glyph::read(data)
    }
}

impl ReadArgs for Loca<'_> {
    type Args = bool;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        Ok(if *args {
            Loca::Long(data)
        } else {
            Loca::Short(data)
        })
    }
}

#[cfg(test)]
mod tests {
    use typeface_test_data::{be_buffer, fonts, tables};

    use super::*;
    use crate::FontRead;

    #[test]
    fn short_and_long() {
        let glyphs = fonts::truetype_glyphs();
        let (_, short) = tables::glyf_loca(&glyphs, false);
        let (_, long) = tables::glyf_loca(&glyphs, true);
        let short = Loca::read(FontData::new(&short), false).unwrap();
        let long = Loca::read(FontData::new(&long), true).unwrap();
        assert_eq!(short.len(), 8);
        assert_eq!(long.len(), 8);
        for gid in 0..8u16 {
            assert_eq!(
                short.glyph_range(GlyphId::new(gid)).unwrap(),
                long.glyph_range(GlyphId::new(gid)).unwrap()
            );
        }
        // the space glyph has no outline
        assert!(short.glyph_range(GlyphId::new(3)).unwrap().is_empty());
        assert!(short.glyph_range(GlyphId::new(8)).is_err());
    }

    #[test]
    fn get_glyf() {
        let (glyf, loca) = tables::glyf_loca(&fonts::truetype_glyphs(), false);
        let glyf = Glyf::read(FontData::new(&glyf)).unwrap();
        let loca = Loca::read(FontData::new(&loca), false).unwrap();
        assert!(matches!(
            loca.get_glyf(GlyphId::new(0), &glyf).unwrap(),
            Glyph::Simple(_)
        ));
        assert!(matches!(
            loca.get_glyf(GlyphId::new(3), &glyf).unwrap(),
            Glyph::Empty
        ));
        assert!(matches!(
            loca.get_glyf(GlyphId::new(4), &glyf).unwrap(),
            Glyph::Composite(_)
        ));
    }

    #[test]
    fn decreasing_offsets() {
        let data = be_buffer!(0u16, 10u16, 4u16);
        let loca = Loca::read(FontData::new(&data), false).unwrap();
        assert_eq!(loca.glyph_range(GlyphId::new(0)).unwrap(), 0..20);
        assert!(matches!(
            loca.glyph_range(GlyphId::new(1)),
            Err(ReadError::MalformedData(_))
        ));
    }
}
