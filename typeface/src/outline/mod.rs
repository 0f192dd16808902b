//! Loading and drawing of glyph outlines.
//!
//! Outlines come from either the `glyf` table (quadratic TrueType contours,
//! possibly composed from other glyphs) or the `CFF ` table (cubic Type2
//! charstrings). Both are emitted to an [`OutlinePen`] in font design units;
//! [`GeometryPen`] turns the commands into a scaled
//! [`PathGeometry`](crate::geometry::PathGeometry).
//!
//! Decoded outlines are cached per glyph. Cache slots are filled at most once
//! and never invalidated.

mod chain;
pub(crate) mod cff;
pub mod glyf;
pub mod pen;

use typeface_read::{
    tables::{cff as cff_table, glyf as glyf_table},
    types::{BoundingBox, GlyphId},
    FontRef, TableProvider,
};

use crate::Error;

pub use glyf::{OutlinePoint, UnscaledOutline, COMPOSITE_DEPTH_LIMIT};
pub use pen::{GeometryPen, OutlinePen, PathElement};

/// Source format of glyph outlines.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutlineFormat {
    /// TrueType outlines from the `glyf` table.
    Glyf,
    /// PostScript outlines from the `CFF ` table.
    Cff,
}

/// Outline source of a font.
pub(crate) enum Outlines<'a> {
    Glyf(glyf::GlyfOutlines<'a>),
    Cff(cff::CffOutlines<'a>),
}

impl<'a> Outlines<'a> {
    /// Selects the outline source of `font`.
    ///
    /// A `CFF ` table takes precedence over `glyf`. Returns `None` when the
    /// font has neither.
    pub fn new(font: &FontRef<'a>, glyph_count: u16) -> Result<Option<Self>, Error> {
        if font.data_for_tag(cff_table::TAG).is_some() {
            let outlines = cff::CffOutlines::new(font, glyph_count)?;
            log::debug!("CFF outlines, CID-keyed: {}", outlines.cff().is_cid());
            return Ok(Some(Self::Cff(outlines)));
        }
        if font.data_for_tag(glyf_table::TAG).is_some() {
            return Ok(Some(Self::Glyf(glyf::GlyfOutlines::new(
                font,
                glyph_count,
            )?)));
        }
        Ok(None)
    }

    pub fn format(&self) -> OutlineFormat {
        match self {
            Self::Glyf(_) => OutlineFormat::Glyf,
            Self::Cff(_) => OutlineFormat::Cff,
        }
    }

    /// Emits the outline of the glyph to `pen` in font design units.
    pub fn draw(&self, glyph_id: GlyphId, pen: &mut impl OutlinePen) -> Result<(), Error> {
        match self {
            Self::Glyf(glyf) => {
                glyf.outline(glyph_id)?.draw(pen);
                Ok(())
            }
            Self::Cff(cff) => cff.draw(glyph_id, pen),
        }
    }

    /// Returns the bounding box of the glyph in font design units, or `None`
    /// for a glyph without contours.
    pub fn bounds(&self, glyph_id: GlyphId) -> Result<Option<BoundingBox<f64>>, Error> {
        Ok(match self {
            Self::Glyf(glyf) => glyf.header_bounds(glyph_id)?.map(|bbox| BoundingBox {
                x_min: bbox.x_min as f64,
                y_min: bbox.y_min as f64,
                x_max: bbox.x_max as f64,
                y_max: bbox.y_max as f64,
            }),
            Self::Cff(cff) => cff.bounds(glyph_id)?.map(|bbox| BoundingBox {
                x_min: bbox.x_min.to_f64(),
                y_min: bbox.y_min.to_f64(),
                x_max: bbox.x_max.to_f64(),
                y_max: bbox.y_max.to_f64(),
            }),
        })
    }

    /// Returns the advance width stored in the charstring of a CFF glyph.
    pub fn charstring_advance_width(&self, glyph_id: GlyphId) -> Result<Option<f64>, Error> {
        match self {
            Self::Glyf(_) => Ok(None),
            Self::Cff(cff) => Ok(Some(cff.advance_width(glyph_id)?.to_f64())),
        }
    }
}
