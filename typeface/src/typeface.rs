//! A parsed font with em-relative metrics, character mapping and outlines.

use typeface_read::{
    tables::{glyf, os2::Os2},
    types::{BoundingBox, GlyphId},
    FontRef, ReadError, TableProvider,
};

use crate::{
    charmap::Charmap,
    geometry::{FillRule, PathGeometry},
    metrics::{to_em, GlyphMetrics, LineMetrics, Metrics},
    outline::{GeometryPen, OutlineFormat, OutlinePen, Outlines},
    Error,
};

/// Options for loading a [`Typeface`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LoadOptions {
    /// Index of the font in a collection file. Must be 0 for a single font.
    pub collection_index: u32,
    /// If true, queries for glyph identifiers beyond the glyph count use
    /// glyph 0 instead of failing.
    pub substitute_missing_glyphs: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            collection_index: 0,
            substitute_missing_glyphs: true,
        }
    }
}

/// A font loaded from memory.
///
/// Construction reads the table directory, checks that every required table
/// is present, loads the metrics and character map and selects the outline
/// source. Any failure along the way aborts construction.
///
/// Metric queries return values relative to the em: font design units
/// divided by [`units_per_em`](Self::units_per_em).
///
/// # Example
///
/// ```no_run
/// # let font_data: Vec<u8> = vec![];
/// use typeface::Typeface;
///
/// let typeface = Typeface::new(&font_data).unwrap();
/// if let Some(glyph_id) = typeface.character_to_glyph_index('A' as u32) {
///     let advance = typeface.advance_width(glyph_id).unwrap();
///     let outline = typeface.glyph_outline(glyph_id, 16.0).unwrap();
///     println!("advance {advance}em, outline {outline}");
/// }
/// ```
pub struct Typeface<'a> {
    font: FontRef<'a>,
    options: LoadOptions,
    metrics: Metrics,
    line_metrics: LineMetrics,
    glyph_metrics: GlyphMetrics,
    charmap: Charmap,
    outlines: Option<Outlines<'a>>,
}

impl<'a> Typeface<'a> {
    /// Loads the first font in `data` with the default options.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        Self::with_options(data, LoadOptions::default())
    }

    /// Loads a font from `data`.
    pub fn with_options(data: &'a [u8], options: LoadOptions) -> Result<Self, Error> {
        let font = FontRef::from_index(data, options.collection_index)?;
        log::debug!(
            "DirectoryRead: {} tables in font {}",
            font.table_directory.num_tables(),
            options.collection_index
        );
        font.table_directory.validate_required()?;
        log::debug!("RequiredTablesValidated");
        let head = font.head()?;
        let hhea = font.hhea()?;
        font.post()?;
        let os2 = optional_os2(&font);
        let glyph_metrics = GlyphMetrics::new(&font)?;
        let metrics = Metrics::new(&font);
        let line_metrics = LineMetrics::new(os2.as_ref(), &hhea);
        let charmap = Charmap::new(font.cmap()?);
        log::debug!(
            "MetricsLoaded: {} units per em, {} glyphs",
            head.units_per_em,
            glyph_metrics.glyph_count()
        );
        let outlines = Outlines::new(&font, glyph_metrics.glyph_count())?;
        log::debug!(
            "Ready: {:?} outlines",
            outlines.as_ref().map(Outlines::format)
        );
        Ok(Self {
            font,
            options,
            metrics,
            line_metrics,
            glyph_metrics,
            charmap,
            outlines,
        })
    }

    /// The underlying font, for access to the raw tables.
    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    pub fn units_per_em(&self) -> u16 {
        self.glyph_metrics.units_per_em()
    }

    /// Returns the number of glyphs declared by the `maxp` table.
    pub fn glyph_count(&self) -> u16 {
        self.glyph_metrics.glyph_count()
    }

    /// Global metrics of the font.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The distance from the top of a line to its baseline.
    ///
    /// This is the typographic ascender from the OS/2 table when present,
    /// else the `hhea` ascender.
    pub fn baseline(&self) -> f64 {
        self.em(self.line_metrics.ascender as i32)
    }

    /// The recommended line height: ascender minus descender plus line gap,
    /// from the same table as [`baseline`](Self::baseline).
    pub fn height(&self) -> f64 {
        let LineMetrics {
            ascender,
            descender,
            line_gap,
        } = self.line_metrics;
        self.em(ascender as i32 - descender as i32 + line_gap as i32)
    }

    pub fn outline_format(&self) -> Option<OutlineFormat> {
        self.outlines.as_ref().map(Outlines::format)
    }

    pub fn charmap(&self) -> &Charmap {
        &self.charmap
    }

    /// Maps a Unicode codepoint to a nominal glyph.
    pub fn character_to_glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        self.charmap.map(codepoint)
    }

    /// Maps a codepoint and variation selector to a glyph.
    ///
    /// Sequences marked as using the default glyph resolve through the
    /// nominal character map.
    pub fn character_variant_to_glyph_index(
        &self,
        codepoint: u32,
        selector: u32,
    ) -> Option<GlyphId> {
        use typeface_read::tables::cmap::MapVariant;
        match self.charmap.map_variant(codepoint, selector)? {
            MapVariant::UseDefault => self.charmap.map(codepoint),
            MapVariant::Variant(glyph_id) => Some(glyph_id),
        }
    }

    pub fn advance_width(&self, glyph_id: GlyphId) -> Result<f64, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        Ok(self.em(self.design_metric(glyph_id, GlyphMetrics::advance_width)?))
    }

    pub fn left_side_bearing(&self, glyph_id: GlyphId) -> Result<f64, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        Ok(self.em(self.design_metric(glyph_id, GlyphMetrics::left_side_bearing)?))
    }

    /// The distance from the right edge of the glyph bounds to the advance
    /// width.
    pub fn right_side_bearing(&self, glyph_id: GlyphId) -> Result<f64, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        let advance = self.design_metric(glyph_id, GlyphMetrics::advance_width)? as f64;
        let lsb = self.design_metric(glyph_id, GlyphMetrics::left_side_bearing)? as f64;
        let width = self
            .design_bounds(glyph_id)?
            .map(|bounds| bounds.x_max - bounds.x_min)
            .unwrap_or_default();
        Ok((advance - lsb - width) / self.units_per_em() as f64)
    }

    /// The advance height from `vmtx`, or the synthesized line height when
    /// the font has no vertical metrics.
    pub fn advance_height(&self, glyph_id: GlyphId) -> Result<f64, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        Ok(self.em(self.design_metric(glyph_id, GlyphMetrics::advance_height)?))
    }

    /// Returns `None` when the font has no vertical metrics.
    pub fn top_side_bearing(&self, glyph_id: GlyphId) -> Result<Option<f64>, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        let tsb = self
            .glyph_metrics
            .top_side_bearing(glyph_id)
            .ok_or(Error::GlyphOutOfRange(glyph_id))?;
        Ok(tsb.map(|tsb| self.em(tsb)))
    }

    /// The distance from the bottom edge of the glyph bounds to the advance
    /// height. Returns `None` when the font has no vertical metrics.
    pub fn bottom_side_bearing(&self, glyph_id: GlyphId) -> Result<Option<f64>, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        let Some(tsb) = self
            .glyph_metrics
            .top_side_bearing(glyph_id)
            .ok_or(Error::GlyphOutOfRange(glyph_id))?
        else {
            return Ok(None);
        };
        let advance = self.design_metric(glyph_id, GlyphMetrics::advance_height)? as f64;
        let height = self
            .design_bounds(glyph_id)?
            .map(|bounds| bounds.y_max - bounds.y_min)
            .unwrap_or_default();
        Ok(Some(
            (advance - tsb as f64 - height) / self.units_per_em() as f64,
        ))
    }

    pub fn has_vertical_metrics(&self) -> bool {
        self.glyph_metrics.has_vertical_metrics()
    }

    /// Returns the advance width encoded in the glyph's charstring for fonts
    /// with CFF outlines, `None` otherwise.
    pub fn charstring_advance_width(&self, glyph_id: GlyphId) -> Result<Option<f64>, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        match &self.outlines {
            Some(outlines) => Ok(outlines
                .charstring_advance_width(glyph_id)?
                .map(|advance| advance / self.units_per_em() as f64)),
            None => Ok(None),
        }
    }

    /// The em-relative bounding box of the glyph in a y-up space, or `None`
    /// for a glyph without contours.
    pub fn glyph_bounds(&self, glyph_id: GlyphId) -> Result<Option<BoundingBox<f64>>, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        let upem = self.units_per_em() as f64;
        Ok(self.design_bounds(glyph_id)?.map(|bounds| BoundingBox {
            x_min: bounds.x_min / upem,
            y_min: bounds.y_min / upem,
            x_max: bounds.x_max / upem,
            y_max: bounds.y_max / upem,
        }))
    }

    /// Emits the outline of the glyph to `pen` in font design units with the
    /// y axis pointing up.
    pub fn draw_glyph(&self, glyph_id: GlyphId, pen: &mut impl OutlinePen) -> Result<(), Error> {
        let glyph_id = self.resolve(glyph_id)?;
        self.outlines()?.draw(glyph_id, pen)
    }

    /// Returns the outline of the glyph scaled to `em_size` in a y-down
    /// space.
    pub fn glyph_outline(&self, glyph_id: GlyphId, em_size: f64) -> Result<PathGeometry, Error> {
        let glyph_id = self.resolve(glyph_id)?;
        let mut pen = GeometryPen::new(
            em_size / self.units_per_em() as f64,
            FillRule::Nonzero,
        );
        self.outlines()?.draw(glyph_id, &mut pen)?;
        Ok(pen.finish())
    }

    fn outlines(&self) -> Result<&Outlines<'a>, Error> {
        self.outlines
            .as_ref()
            .ok_or(Error::Read(ReadError::TableIsMissing(glyf::TAG)))
    }

    fn design_bounds(&self, glyph_id: GlyphId) -> Result<Option<BoundingBox<f64>>, Error> {
        match &self.outlines {
            Some(outlines) => outlines.bounds(glyph_id),
            None => Ok(None),
        }
    }

    fn design_metric(
        &self,
        glyph_id: GlyphId,
        f: impl Fn(&GlyphMetrics, GlyphId) -> Option<i32>,
    ) -> Result<i32, Error> {
        f(&self.glyph_metrics, glyph_id).ok_or(Error::GlyphOutOfRange(glyph_id))
    }

    /// Maps an out of range glyph to glyph 0 when substitution is enabled.
    fn resolve(&self, glyph_id: GlyphId) -> Result<GlyphId, Error> {
        if glyph_id.to_u16() < self.glyph_count() {
            Ok(glyph_id)
        } else if self.options.substitute_missing_glyphs && self.glyph_count() > 0 {
            log::warn!(
                "{glyph_id} is out of range for {} glyphs, using {}",
                self.glyph_count(),
                GlyphId::NOTDEF
            );
            Ok(GlyphId::NOTDEF)
        } else {
            Err(Error::GlyphOutOfRange(glyph_id))
        }
    }

    fn em(&self, value: i32) -> f64 {
        to_em(value, self.units_per_em())
    }
}

/// Loads the OS/2 table, ignoring it when malformed.
fn optional_os2(font: &FontRef) -> Option<Os2> {
    match font.os2() {
        Ok(os2) => Some(os2),
        Err(ReadError::TableIsMissing(_)) => None,
        Err(err) => {
            log::warn!("ignoring malformed OS/2 table: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::PathElement;
    use pretty_assertions::assert_eq;
    use typeface_read::{types::Tag, ErrorKind};
    use typeface_test_data::{
        fonts::{self, info},
        sfnt, tables,
    };

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn load_truetype() {
        init_logging();
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        assert_eq!(typeface.glyph_count(), info::TRUETYPE_GLYPH_COUNT);
        assert_eq!(typeface.units_per_em(), info::UNITS_PER_EM);
        assert_eq!(typeface.outline_format(), Some(OutlineFormat::Glyf));
        assert_eq!(typeface.options(), LoadOptions::default());
    }

    #[test]
    fn load_cff() {
        init_logging();
        let data = fonts::simple_cff();
        let typeface = Typeface::new(&data).unwrap();
        assert_eq!(typeface.glyph_count(), info::CFF_GLYPH_COUNT);
        assert_eq!(typeface.outline_format(), Some(OutlineFormat::Cff));
    }

    #[test]
    fn empty_input() {
        let err = Typeface::new(&[]).err().unwrap();
        assert_eq!(err, Error::Read(ReadError::EmptyInput));
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn zero_units_per_em() {
        let mut builder = fonts::truetype_builder();
        builder.add_table(
            Tag::new(b"head"),
            tables::head(&tables::Head {
                units_per_em: 0,
                ..Default::default()
            }),
        );
        let data = builder.build();
        let err = Typeface::new(&data).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn collection_index() {
        let data = sfnt::build_collection(&[
            &fonts::truetype_builder(),
            &fonts::cff_builder(&fonts::cff_spec()),
        ]);
        let options = LoadOptions {
            collection_index: 1,
            ..Default::default()
        };
        let typeface = Typeface::with_options(&data, options).unwrap();
        assert_eq!(typeface.outline_format(), Some(OutlineFormat::Cff));
        assert_eq!(typeface.font().ttc_index(), Some(1));
    }

    #[test]
    fn line_metrics() {
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        // OS/2 typographic metrics: 800, -200, 90
        assert_eq!(typeface.baseline(), 0.8);
        assert_eq!(typeface.height(), 1.09);
    }

    #[test]
    fn line_metrics_from_hhea() {
        let mut builder = fonts::truetype_builder();
        builder.remove_table(Tag::new(b"OS/2"));
        let data = builder.build();
        let typeface = Typeface::new(&data).unwrap();
        assert_eq!(typeface.baseline(), 0.85);
        assert_eq!(typeface.height(), 1.1);
    }

    #[test]
    fn horizontal_metrics() {
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        let glyph_a = GlyphId::new(info::GID_A);
        assert_eq!(typeface.advance_width(glyph_a).unwrap(), 0.52);
        assert_eq!(typeface.left_side_bearing(glyph_a).unwrap(), 0.0);
        // advance 520, bounds 0..500
        assert_eq!(typeface.right_side_bearing(glyph_a).unwrap(), 0.02);
        let notdef = GlyphId::NOTDEF;
        // advance 500, lsb 50, bounds 50..450
        assert_eq!(typeface.right_side_bearing(notdef).unwrap(), 0.05);
        let space = GlyphId::new(info::GID_SPACE);
        assert_eq!(typeface.right_side_bearing(space).unwrap(), 0.25);
    }

    #[test]
    fn vertical_metrics() {
        let data = fonts::truetype_with_vertical();
        let typeface = Typeface::new(&data).unwrap();
        assert!(typeface.has_vertical_metrics());
        let notdef = GlyphId::NOTDEF;
        assert_eq!(typeface.advance_height(notdef).unwrap(), 1.0);
        assert_eq!(typeface.top_side_bearing(notdef).unwrap(), Some(0.1));
        // advance 1000, tsb 100, bounds 0..700
        assert_eq!(typeface.bottom_side_bearing(notdef).unwrap(), Some(0.2));
    }

    #[test]
    fn synthesized_vertical_metrics() {
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        assert!(!typeface.has_vertical_metrics());
        let glyph_a = GlyphId::new(info::GID_A);
        assert_eq!(typeface.advance_height(glyph_a).unwrap(), 1.0);
        assert_eq!(typeface.top_side_bearing(glyph_a).unwrap(), None);
        assert_eq!(typeface.bottom_side_bearing(glyph_a).unwrap(), None);
    }

    #[test]
    fn substitutes_missing_glyphs() {
        init_logging();
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        let missing = GlyphId::new(info::TRUETYPE_GLYPH_COUNT);
        assert_eq!(
            typeface.advance_width(missing).unwrap(),
            typeface.advance_width(GlyphId::NOTDEF).unwrap()
        );
        assert_eq!(
            typeface.glyph_outline(missing, 1000.0).unwrap(),
            typeface.glyph_outline(GlyphId::NOTDEF, 1000.0).unwrap()
        );
    }

    #[test]
    fn rejects_missing_glyphs() {
        let data = fonts::simple_truetype();
        let options = LoadOptions {
            substitute_missing_glyphs: false,
            ..Default::default()
        };
        let typeface = Typeface::with_options(&data, options).unwrap();
        let missing = GlyphId::new(info::TRUETYPE_GLYPH_COUNT);
        let err = typeface.advance_width(missing).unwrap_err();
        assert_eq!(err, Error::GlyphOutOfRange(missing));
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert!(typeface.glyph_outline(missing, 16.0).is_err());
        assert!(typeface.top_side_bearing(missing).is_err());
    }

    #[test]
    fn character_mapping() {
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        assert_eq!(
            typeface.character_to_glyph_index('A' as u32),
            Some(GlyphId::new(info::GID_A))
        );
        assert_eq!(typeface.character_to_glyph_index('Z' as u32), None);
        assert_eq!(
            typeface.character_variant_to_glyph_index('A' as u32, 0xFE00),
            Some(GlyphId::new(info::GID_A))
        );
        assert_eq!(
            typeface.character_variant_to_glyph_index('O' as u32, 0xFE01),
            Some(GlyphId::new(info::GID_A))
        );
        assert_eq!(
            typeface.character_variant_to_glyph_index('O' as u32, 0xFE00),
            None
        );
    }

    #[test]
    fn glyph_bounds() {
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        let bounds = typeface.glyph_bounds(GlyphId::NOTDEF).unwrap().unwrap();
        assert_eq!(
            [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max],
            [0.05, 0.0, 0.45, 0.7]
        );
        let space = GlyphId::new(info::GID_SPACE);
        assert_eq!(typeface.glyph_bounds(space).unwrap(), None);
    }

    #[test]
    fn draw_in_design_units() {
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        let mut path = Vec::new();
        typeface.draw_glyph(GlyphId::NOTDEF, &mut path).unwrap();
        assert_eq!(
            path,
            vec![
                PathElement::MoveTo { x: 450.0, y: 0.0 },
                PathElement::LineTo { x: 50.0, y: 0.0 },
                PathElement::LineTo { x: 50.0, y: 700.0 },
                PathElement::LineTo { x: 450.0, y: 700.0 },
                PathElement::Close,
            ]
        );
    }

    #[test]
    fn outline_scaled_and_flipped() {
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        let outline = typeface.glyph_outline(GlyphId::NOTDEF, 100.0).unwrap();
        assert_eq!(outline.fill_rule, FillRule::Nonzero);
        assert_eq!(outline.to_string(), "M45,0L5,0L5,-70L45,-70z ");
    }

    #[test]
    fn cff_charstring_advance() {
        let data = fonts::simple_cff();
        let typeface = Typeface::new(&data).unwrap();
        for (gid, advance) in info::CFF_ADVANCES.iter().enumerate() {
            let glyph_id = GlyphId::new(gid as u16);
            assert_eq!(
                typeface.charstring_advance_width(glyph_id).unwrap(),
                Some(*advance as f64 / 1000.0)
            );
        }
        let data = fonts::simple_truetype();
        let typeface = Typeface::new(&data).unwrap();
        assert_eq!(
            typeface.charstring_advance_width(GlyphId::NOTDEF).unwrap(),
            None
        );
    }

    #[test]
    fn missing_outlines() {
        let mut builder = fonts::truetype_builder();
        builder
            .remove_table(Tag::new(b"glyf"))
            .remove_table(Tag::new(b"loca"));
        let data = builder.build();
        let typeface = Typeface::new(&data).unwrap();
        assert_eq!(typeface.outline_format(), None);
        assert_eq!(
            typeface.glyph_outline(GlyphId::NOTDEF, 16.0).unwrap_err(),
            Error::Read(ReadError::TableIsMissing(glyf::TAG))
        );
        assert_eq!(typeface.glyph_bounds(GlyphId::NOTDEF).unwrap(), None);
    }
}
