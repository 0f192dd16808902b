//! Typed access to the tables read when loading a typeface.

use types::Tag;

use crate::{
    tables::{self, hvhea::HVhea, hvmtx::HVmtx},
    FontData, FontRead, FontReadWithArgs, ReadError,
};

/// Serves the tables of a single font.
///
/// Implementors only provide [`data_for_tag`](Self::data_for_tag); every
/// other method decodes one table and reports a missing table as
/// [`ReadError::TableIsMissing`]. Tables that depend on values stored
/// elsewhere (the metric tables and `loca`) read those dependencies first.
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    /// Decodes the table stored under `tag`.
    fn table<T: FontRead<'a>>(&self, tag: Tag) -> Result<T, ReadError> {
        self.data_for_tag(tag)
            .ok_or(ReadError::TableIsMissing(tag))
            .and_then(T::read)
    }

    fn head(&self) -> Result<tables::head::Head, ReadError> {
        self.table(tables::head::TAG)
    }

    fn maxp(&self) -> Result<tables::maxp::Maxp, ReadError> {
        self.table(tables::maxp::TAG)
    }

    fn hhea(&self) -> Result<HVhea, ReadError> {
        self.table(tables::hhea::TAG)
    }

    fn vhea(&self) -> Result<HVhea, ReadError> {
        self.table(tables::vhea::TAG)
    }

    /// Horizontal metrics, expanded to one entry per glyph.
    fn hmtx(&self) -> Result<HVmtx, ReadError> {
        let header = self.hhea()?;
        self.long_metrics(tables::hmtx::TAG, &header)
    }

    /// Vertical metrics, expanded to one entry per glyph.
    ///
    /// Fails with a missing `vhea` when only `vmtx` is present.
    fn vmtx(&self) -> Result<HVmtx, ReadError> {
        let header = self.vhea()?;
        self.long_metrics(tables::vmtx::TAG, &header)
    }

    /// Reads `hmtx` or `vmtx` using the long metric count of its header
    /// and the glyph count of `maxp`.
    fn long_metrics(&self, tag: Tag, header: &HVhea) -> Result<HVmtx, ReadError> {
        let num_glyphs = self.maxp()?.num_glyphs;
        let data = self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))?;
        HVmtx::read_with_args(data, &(header.number_of_long_metrics, num_glyphs))
    }

    fn os2(&self) -> Result<tables::os2::Os2, ReadError> {
        self.table(tables::os2::TAG)
    }

    fn post(&self) -> Result<tables::post::Post, ReadError> {
        self.table(tables::post::TAG)
    }

    fn cmap(&self) -> Result<tables::cmap::Cmap, ReadError> {
        self.table(tables::cmap::TAG)
    }

    /// Glyph offsets, in the offset size selected by `head`.
    fn loca(&self) -> Result<tables::loca::Loca<'a>, ReadError> {
        let is_long = match self.head()?.index_to_loc_format {
            0 => false,
            1 => true,
            _ => return Err(ReadError::MalformedData("unknown indexToLocFormat")),
        };
        let data = self
            .data_for_tag(tables::loca::TAG)
            .ok_or(ReadError::TableIsMissing(tables::loca::TAG))?;
        tables::loca::Loca::read_with_args(data, &is_long)
    }

    fn glyf(&self) -> Result<tables::glyf::Glyf<'a>, ReadError> {
        self.table(tables::glyf::TAG)
    }

    fn cff(&self) -> Result<tables::cff::Cff<'a>, tables::postscript::Error> {
        let data = self
            .data_for_tag(tables::cff::TAG)
            .ok_or(ReadError::TableIsMissing(tables::cff::TAG))?;
        tables::cff::Cff::new(data)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typeface_test_data::{fonts, tables as build};
    use types::{GlyphId, Tag};

    use super::TableProvider;
    use crate::{FontRef, ReadError};

    #[test]
    fn metrics_cover_every_glyph() {
        let data = fonts::truetype_with_vertical();
        let font = FontRef::new(&data).unwrap();
        let num_glyphs = font.maxp().unwrap().num_glyphs as usize;
        let hmtx = font.hmtx().unwrap();
        let vmtx = font.vmtx().unwrap();
        assert_eq!(hmtx.len(), num_glyphs);
        assert_eq!(vmtx.len(), num_glyphs);
        assert_eq!(vmtx.number_of_long_metrics(), 2);
        // trailing glyphs repeat the last long advance
        assert_eq!(vmtx.advance(GlyphId::new(7)), Some(900));
    }

    #[test]
    fn vertical_metrics_need_their_header() {
        let mut builder = fonts::truetype_builder();
        builder.add_table(Tag::new(b"vmtx"), build::hvmtx(&[(1000, 0)], &[]));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(
            font.vmtx().unwrap_err(),
            ReadError::TableIsMissing(Tag::new(b"vhea"))
        );
    }

    #[test]
    fn loca_offset_size_follows_head() {
        let (glyf, loca) = build::glyf_loca(&fonts::truetype_glyphs(), true);
        let mut builder = fonts::truetype_builder();
        builder
            .add_table(
                Tag::new(b"head"),
                build::head(&build::Head {
                    long_loca: true,
                    ..Default::default()
                }),
            )
            .add_table(Tag::new(b"glyf"), glyf)
            .add_table(Tag::new(b"loca"), loca);
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let long = font.loca().unwrap();
        let short_data = fonts::simple_truetype();
        let short = FontRef::new(&short_data).unwrap().loca().unwrap();
        assert_eq!(long.len(), short.len());
        for gid in 0..fonts::info::TRUETYPE_GLYPH_COUNT {
            let gid = GlyphId::new(gid);
            assert_eq!(long.glyph_range(gid), short.glyph_range(gid));
        }
    }

    #[test]
    fn missing_outline_tables() {
        let data = fonts::simple_truetype();
        let font = FontRef::new(&data).unwrap();
        assert!(font.glyf().is_ok());
        assert!(matches!(
            font.cff().unwrap_err(),
            crate::tables::postscript::Error::Read(ReadError::TableIsMissing(tag)) if tag == Tag::new(b"CFF ")
        ));
    }
}
