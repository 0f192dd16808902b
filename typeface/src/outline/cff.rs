//! Loading of CFF outlines.

use std::sync::{Arc, OnceLock};

use typeface_read::{
    tables::{
        cff::Cff,
        postscript::charstring::{Charstring, CommandSink},
    },
    types::{BoundingBox, Fixed, GlyphId},
    FontRef, TableProvider,
};

use super::pen::OutlinePen;
use crate::Error;

/// CFF outline source with a write-once cache of parsed charstrings.
pub(crate) struct CffOutlines<'a> {
    cff: Cff<'a>,
    cache: Vec<OnceLock<Arc<Charstring>>>,
}

impl<'a> CffOutlines<'a> {
    pub fn new(font: &FontRef<'a>, glyph_count: u16) -> Result<Self, Error> {
        Ok(Self {
            cff: font.cff()?,
            cache: (0..glyph_count).map(|_| OnceLock::new()).collect(),
        })
    }

    pub fn cff(&self) -> &Cff<'a> {
        &self.cff
    }

    /// Returns the parsed charstring for the given glyph.
    pub fn charstring(&self, glyph_id: GlyphId) -> Result<Arc<Charstring>, Error> {
        let slot = self
            .cache
            .get(glyph_id.to_usize())
            .ok_or(Error::GlyphOutOfRange(glyph_id))?;
        if let Some(charstring) = slot.get() {
            return Ok(charstring.clone());
        }
        let charstring = self.cff.charstring(glyph_id)?;
        log::trace!(
            "cached charstring for {glyph_id}: {} operations",
            charstring.operations().len()
        );
        Ok(slot.get_or_init(|| Arc::new(charstring)).clone())
    }

    /// Returns the advance width encoded in the charstring, in font design
    /// units.
    pub fn advance_width(&self, glyph_id: GlyphId) -> Result<Fixed, Error> {
        let charstring = self.charstring(glyph_id)?;
        Ok(self.cff.advance_width(glyph_id, &charstring)?)
    }

    /// Returns the bounds of all points of the glyph, including control
    /// points.
    pub fn bounds(&self, glyph_id: GlyphId) -> Result<Option<BoundingBox<Fixed>>, Error> {
        Ok(self.charstring(glyph_id)?.bounds()?)
    }

    /// Emits the outline to `pen` in font design units.
    pub fn draw(&self, glyph_id: GlyphId, pen: &mut impl OutlinePen) -> Result<(), Error> {
        let charstring = self.charstring(glyph_id)?;
        charstring.draw(&mut PenSink(pen))?;
        Ok(())
    }
}

/// Command sink adapter that forwards to an outline pen.
struct PenSink<'a, P>(&'a mut P);

impl<P: OutlinePen> CommandSink for PenSink<'_, P> {
    fn move_to(&mut self, x: Fixed, y: Fixed) {
        self.0.move_to(x.to_f64(), y.to_f64());
    }

    fn line_to(&mut self, x: Fixed, y: Fixed) {
        self.0.line_to(x.to_f64(), y.to_f64());
    }

    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
        self.0.curve_to(
            cx0.to_f64(),
            cy0.to_f64(),
            cx1.to_f64(),
            cy1.to_f64(),
            x.to_f64(),
            y.to_f64(),
        );
    }

    fn close(&mut self) {
        self.0.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::pen::PathElement;
    use pretty_assertions::assert_eq;
    use typeface_test_data::fonts::{self, info};

    fn outlines(data: &[u8]) -> CffOutlines<'_> {
        let font = FontRef::new(data).unwrap();
        CffOutlines::new(&font, info::CFF_GLYPH_COUNT).unwrap()
    }

    #[test]
    fn draw_rectangle() {
        let data = fonts::simple_cff();
        let outlines = outlines(&data);
        let mut path = Vec::new();
        outlines.draw(GlyphId::new(0), &mut path).unwrap();
        assert_eq!(
            path,
            vec![
                PathElement::MoveTo { x: 50.0, y: 0.0 },
                PathElement::LineTo { x: 450.0, y: 0.0 },
                PathElement::LineTo { x: 450.0, y: 700.0 },
                PathElement::LineTo { x: 50.0, y: 700.0 },
                PathElement::Close,
            ]
        );
    }

    #[test]
    fn draw_subroutines() {
        let data = fonts::simple_cff();
        let outlines = outlines(&data);
        let mut path = Vec::new();
        outlines.draw(GlyphId::new(2), &mut path).unwrap();
        assert_eq!(
            path,
            vec![
                PathElement::MoveTo { x: 0.0, y: 0.0 },
                PathElement::CurveTo {
                    cx0: 100.0,
                    cy0: 0.0,
                    cx1: 200.0,
                    cy1: 100.0,
                    x: 200.0,
                    y: 200.0
                },
                PathElement::Close,
            ]
        );
    }

    #[test]
    fn advances() {
        let data = fonts::simple_cff();
        let outlines = outlines(&data);
        for (gid, expected) in info::CFF_ADVANCES.iter().enumerate() {
            let advance = outlines.advance_width(GlyphId::new(gid as u16)).unwrap();
            assert_eq!(advance, Fixed::from_i32(*expected as i32), "glyph {gid}");
        }
    }

    #[test]
    fn bounds() {
        let data = fonts::simple_cff();
        let outlines = outlines(&data);
        let bounds = outlines.bounds(GlyphId::new(0)).unwrap().unwrap();
        assert_eq!(
            [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max].map(Fixed::to_i32),
            [50, 0, 450, 700]
        );
        assert_eq!(outlines.bounds(GlyphId::new(3)).unwrap(), None);
    }

    #[test]
    fn charstrings_are_cached() {
        let data = fonts::simple_cff();
        let outlines = outlines(&data);
        let gid = GlyphId::new(1);
        let first = outlines.charstring(gid).unwrap();
        let second = outlines.charstring(gid).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let out_of_range = GlyphId::new(info::CFF_GLYPH_COUNT);
        assert_eq!(
            outlines.charstring(out_of_range).map(|_| ()),
            Err(Error::GlyphOutOfRange(out_of_range))
        );
    }

    #[test]
    fn cid_font() {
        let data = fonts::cid_cff();
        let outlines = outlines(&data);
        assert!(outlines.cff().is_cid());
        let mut path = Vec::new();
        outlines.draw(GlyphId::new(1), &mut path).unwrap();
        assert_eq!(path.len(), 4);
        // glyph 3 uses the second font DICT
        assert_eq!(
            outlines.advance_width(GlyphId::new(3)).unwrap(),
            Fixed::from_i32(250)
        );
    }
}
