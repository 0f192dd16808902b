//! Global font and glyph specific metrics.
//!
//! Metrics are various measurements that define positioning and layout
//! characteristics for a font. They come in two flavors:
//!
//! * Global metrics: these are applicable to all glyphs in a font and generally
//!   define values that are used for the layout of a collection of glyphs. For example,
//!   the ascent, descent and leading values determine the position of the baseline where
//!   a glyph should be rendered as well as the suggested spacing above and below it.
//!
//! * Glyph metrics: these apply to single glyphs. For example, the advance
//!   width value describes the distance between two consecutive glyphs on a line.
//!
//! All values are em-relative: font design units divided by the units per
//! em of the font.

use typeface_read::{
    tables::{
        hvhea::HVhea,
        hvmtx::HVmtx,
        os2::{selection, Os2},
    },
    types::{BoundingBox, GlyphId},
    TableProvider,
};

use crate::Error;

/// Metrics for a text decoration.
///
/// This represents the suggested offset and thickness of an underline
/// or strikeout text decoration.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decoration {
    /// Offset to the top of the decoration from the baseline.
    pub offset: f64,
    /// Thickness of the decoration.
    pub thickness: f64,
}

/// Metrics that apply to all glyphs in a font.
///
/// This metrics here are derived from the following tables:
/// * [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head): `units_per_em`, `bounds`
/// * [maxp](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp): `glyph_count`
/// * [post](https://learn.microsoft.com/en-us/typography/opentype/spec/post): `is_monospace`, `italic_angle`, `underline`
/// * [OS/2](https://learn.microsoft.com/en-us/typography/opentype/spec/os2): `average_width`, `cap_height`,
///   `x_height`, `strikeout`, as well as the line metrics: `ascent`, `descent`, `leading` if the `USE_TYPO_METRICS`
///   flag is set or the `hhea` line metrics are zero (the Windows metrics are used as a last resort).
/// * [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea): `max_width`, as well as the line metrics:
///   `ascent`, `descent`, `leading` if they are non-zero and the `USE_TYPO_METRICS` flag is not set in the OS/2 table
#[derive(Copy, Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Number of font design units per em unit.
    pub units_per_em: u16,
    /// Number of glyphs in the font.
    pub glyph_count: u16,
    /// True if the font is not proportionally spaced.
    pub is_monospace: bool,
    /// Italic angle in counter-clockwise degrees from the vertical. Zero for upright text,
    /// negative for text that leans to the right.
    pub italic_angle: f64,
    /// Distance from the baseline to the top of the alignment box.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the alignment box.
    pub descent: f64,
    /// Recommended additional spacing between lines.
    pub leading: f64,
    /// Distance from the baseline to the top of a typical English capital.
    pub cap_height: Option<f64>,
    /// Distance from the baseline to the top of the lowercase "x" or
    /// similar character.
    pub x_height: Option<f64>,
    /// Average width of all non-zero width characters in the font.
    pub average_width: Option<f64>,
    /// Maximum advance width of all characters in the font.
    pub max_width: Option<f64>,
    /// Metrics for an underline decoration.
    pub underline: Option<Decoration>,
    /// Metrics for a strikeout decoration.
    pub strikeout: Option<Decoration>,
    /// Union of minimum and maximum extents for all glyphs in the font.
    pub bounds: Option<BoundingBox<f64>>,
}

impl Metrics {
    /// Creates new metrics for the given font.
    ///
    /// Tables that are missing or malformed leave the corresponding fields
    /// at their defaults.
    pub fn new<'a>(font: &impl TableProvider<'a>) -> Self {
        let mut metrics = Metrics {
            units_per_em: font
                .head()
                .map(|head| head.units_per_em)
                .unwrap_or_default(),
            ..Default::default()
        };
        let units_per_em = metrics.units_per_em;
        let em = |value: i32| to_em(value, units_per_em);
        if let Ok(head) = font.head() {
            metrics.bounds = Some(BoundingBox {
                x_min: em(head.bbox.x_min.into()),
                y_min: em(head.bbox.y_min.into()),
                x_max: em(head.bbox.x_max.into()),
                y_max: em(head.bbox.y_max.into()),
            });
        }
        if let Ok(maxp) = font.maxp() {
            metrics.glyph_count = maxp.num_glyphs;
        }
        if let Ok(post) = font.post() {
            metrics.is_monospace = post.is_fixed_pitch != 0;
            metrics.italic_angle = post.italic_angle.to_f64();
            metrics.underline = Some(Decoration {
                offset: em(post.underline_position.into()),
                thickness: em(post.underline_thickness.into()),
            });
        }
        let hhea = font.hhea().ok();
        if let Some(hhea) = &hhea {
            metrics.max_width = Some(em(hhea.advance_max.into()));
        }
        // Line metrics follow FreeType:
        // 1. Use the OS/2 metrics if the table exists and the USE_TYPO_METRICS
        //    flag is set.
        // 2. Otherwise, use the hhea metrics.
        // 3. If hhea metrics are zero and the OS/2 table exists:
        //    3a. Use the typo metrics if they are non-zero
        //    3b. Otherwise, use the win metrics
        let os2 = font.os2().ok();
        let mut used_typo_metrics = false;
        if let Some(os2) = &os2 {
            if os2.selection(selection::USE_TYPO_METRICS) {
                if let Some((ascender, descender, line_gap)) = typo_metrics(os2) {
                    metrics.ascent = em(ascender.into());
                    metrics.descent = em(descender.into());
                    metrics.leading = em(line_gap.into());
                    used_typo_metrics = true;
                }
            }
            metrics.average_width = Some(em(os2.x_avg_char_width.into()));
            metrics.cap_height = os2.s_cap_height.map(|v| em(v.into()));
            metrics.x_height = os2.sx_height.map(|v| em(v.into()));
            metrics.strikeout = Some(Decoration {
                offset: em(os2.y_strikeout_position.into()),
                thickness: em(os2.y_strikeout_size.into()),
            });
        }
        if !used_typo_metrics {
            if let Some(hhea) = &hhea {
                metrics.ascent = em(hhea.ascender.into());
                metrics.descent = em(hhea.descender.into());
                metrics.leading = em(hhea.line_gap.into());
            }
            if metrics.ascent == 0.0 && metrics.descent == 0.0 {
                if let Some(os2) = &os2 {
                    match typo_metrics(os2) {
                        Some((ascender, descender, line_gap))
                            if ascender != 0 || descender != 0 =>
                        {
                            metrics.ascent = em(ascender.into());
                            metrics.descent = em(descender.into());
                            metrics.leading = em(line_gap.into());
                        }
                        _ => {
                            metrics.ascent = em(os2.us_win_ascent.unwrap_or_default().into());
                            // Win descent is always positive while other descent values are negative. Negate it
                            // to ensure we return consistent metrics.
                            metrics.descent = -em(os2.us_win_descent.unwrap_or_default().into());
                        }
                    }
                }
            }
        }
        metrics
    }
}

/// The typographic ascender, descender and line gap of an OS/2 table that
/// includes them.
fn typo_metrics(os2: &Os2) -> Option<(i16, i16, i16)> {
    Some((
        os2.s_typo_ascender?,
        os2.s_typo_descender?,
        os2.s_typo_line_gap?,
    ))
}

/// Ascender, descender and line gap in font design units used for the
/// baseline and line height of a typeface.
///
/// These are the OS/2 typographic metrics when the table provides them and
/// the `hhea` metrics otherwise.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct LineMetrics {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

impl LineMetrics {
    pub fn new(os2: Option<&Os2>, hhea: &HVhea) -> Self {
        match os2.and_then(typo_metrics) {
            Some((ascender, descender, line_gap)) => Self {
                ascender,
                descender,
                line_gap,
            },
            None => Self {
                ascender: hhea.ascender,
                descender: hhea.descender,
                line_gap: hhea.line_gap,
            },
        }
    }
}

/// Source of per-glyph vertical metrics.
#[derive(Clone, Debug)]
enum VerticalMetrics {
    /// The `vhea` and `vmtx` tables.
    Table(HVmtx),
    /// A single advance height for every glyph, derived from the line
    /// metrics; top side bearings are unavailable.
    Synthesized { advance: i32 },
}

/// Glyph specific metrics in font design units.
///
/// Horizontal metrics come from `hmtx`. Vertical metrics come from `vmtx`
/// when the font has `vhea` and `vmtx` tables; otherwise the advance height
/// of every glyph is the distance between the typographic ascender and
/// descender (or the `hhea` ones when there is no OS/2 table).
#[derive(Clone, Debug)]
pub struct GlyphMetrics {
    units_per_em: u16,
    glyph_count: u16,
    hmtx: HVmtx,
    vertical: VerticalMetrics,
}

impl GlyphMetrics {
    /// Loads the glyph metrics for the given font.
    ///
    /// Fails if any of the `head`, `maxp`, `hhea` or `hmtx` tables is missing
    /// or malformed.
    pub fn new<'a>(font: &impl TableProvider<'a>) -> Result<Self, Error> {
        let units_per_em = font.head()?.units_per_em;
        let glyph_count = font.maxp()?.num_glyphs;
        let hmtx = font.hmtx()?;
        let vertical = match font.vmtx() {
            Ok(vmtx) => VerticalMetrics::Table(vmtx),
            Err(err) => {
                let hhea = font.hhea()?;
                let os2 = font.os2().ok();
                let advance = match os2.as_ref().and_then(typo_metrics) {
                    Some((ascender, descender, _)) => ascender as i32 - descender as i32,
                    None => hhea.ascender as i32 - hhea.descender as i32,
                };
                log::warn!("synthesizing vertical metrics with advance height {advance}: {err}");
                VerticalMetrics::Synthesized { advance }
            }
        };
        Ok(Self {
            units_per_em,
            glyph_count,
            hmtx,
            vertical,
        })
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Returns the number of available glyphs.
    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// Returns true if vertical metrics come from the `vmtx` table.
    pub fn has_vertical_metrics(&self) -> bool {
        matches!(self.vertical, VerticalMetrics::Table(_))
    }

    /// Returns the advance width for the specified glyph.
    ///
    /// Glyphs beyond the last long metric repeat its advance.
    pub fn advance_width(&self, glyph_id: GlyphId) -> Option<i32> {
        self.check(glyph_id)?;
        self.hmtx.advance(glyph_id).map(i32::from)
    }

    /// Returns the left side bearing for the specified glyph.
    pub fn left_side_bearing(&self, glyph_id: GlyphId) -> Option<i32> {
        self.check(glyph_id)?;
        self.hmtx.side_bearing(glyph_id).map(i32::from)
    }

    /// Returns the advance height for the specified glyph.
    pub fn advance_height(&self, glyph_id: GlyphId) -> Option<i32> {
        self.check(glyph_id)?;
        match &self.vertical {
            VerticalMetrics::Table(vmtx) => vmtx.advance(glyph_id).map(i32::from),
            VerticalMetrics::Synthesized { advance } => Some(*advance),
        }
    }

    /// Returns the top side bearing for the specified glyph.
    ///
    /// The outer option is `None` for an invalid glyph; the inner one is
    /// `None` when vertical metrics were synthesized.
    pub fn top_side_bearing(&self, glyph_id: GlyphId) -> Option<Option<i32>> {
        self.check(glyph_id)?;
        match &self.vertical {
            VerticalMetrics::Table(vmtx) => vmtx.side_bearing(glyph_id).map(|tsb| Some(tsb.into())),
            VerticalMetrics::Synthesized { .. } => Some(None),
        }
    }

    fn check(&self, glyph_id: GlyphId) -> Option<()> {
        (glyph_id.to_u16() < self.glyph_count).then_some(())
    }
}

/// Converts a value in font design units to ems.
pub(crate) fn to_em(value: i32, units_per_em: u16) -> f64 {
    if units_per_em == 0 {
        0.0
    } else {
        value as f64 / units_per_em as f64
    }
}
