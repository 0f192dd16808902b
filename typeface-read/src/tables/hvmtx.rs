//! The Horizontal/Vertical Metrics tables.
//!
//! The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx)
//! and [vmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/vmtx)
//! tables have the same structure and so we define them in the same module.

use types::GlyphId;

use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError};

/// An advance and side bearing pair for a single glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongMetric {
    /// Advance width or height, in font units.
    pub advance: u16,
    /// Left or top side bearing, in font units.
    pub side_bearing: i16,
}

/// The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx)
/// or [vmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/vmtx) table.
///
/// The stored metrics are expanded so there is exactly one entry per glyph:
/// glyphs beyond the last long metric repeat its advance and take their side
/// bearing from the trailing bearing array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HVmtx {
    number_of_long_metrics: u16,
    metrics: Vec<LongMetric>,
}

impl HVmtx {
    /// The number of entries stored as full long metrics.
    pub fn number_of_long_metrics(&self) -> u16 {
        self.number_of_long_metrics
    }

    /// The per-glyph metrics.
    pub fn metrics(&self) -> &[LongMetric] {
        &self.metrics
    }

    /// Returns the metric for the given glyph.
    pub fn get(&self, glyph_id: GlyphId) -> Option<LongMetric> {
        self.metrics.get(glyph_id.to_usize()).copied()
    }

    /// Returns the advance width or height for the given glyph.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        self.get(glyph_id).map(|metric| metric.advance)
    }

    /// Returns the left or top side bearing for the given glyph.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        self.get(glyph_id).map(|metric| metric.side_bearing)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl ReadArgs for HVmtx {
    /// `(number_of_long_metrics, num_glyphs)`
    type Args = (u16, u16);
}

impl<'a> FontReadWithArgs<'a> for HVmtx {
    fn read_with_args(data: FontData<'a>, args: &(u16, u16)) -> Result<Self, ReadError> {
        let (number_of_long_metrics, num_glyphs) = *args;
        if number_of_long_metrics == 0 && num_glyphs != 0 {
            return Err(ReadError::MalformedData(
                "metrics table requires at least one long metric",
            ));
        }
        let mut cursor = data.cursor();
        let mut metrics = Vec::with_capacity(num_glyphs.max(number_of_long_metrics) as usize);
        for _ in 0..number_of_long_metrics {
            metrics.push(LongMetric {
                advance: cursor.read_u16()?,
                side_bearing: cursor.read_i16()?,
            });
        }
        let last_advance = metrics.last().map(|metric| metric.advance).unwrap_or(0);
        for _ in number_of_long_metrics..num_glyphs {
            metrics.push(LongMetric {
                advance: last_advance,
                side_bearing: cursor.read_i16()?,
            });
        }
        metrics.truncate(num_glyphs as usize);
        Ok(HVmtx {
            number_of_long_metrics,
            metrics,
        })
    }
}

impl HVmtx {
    /// Read the table with the given number of long metrics and glyph count.
    pub fn read(
        data: FontData,
        number_of_long_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Self, ReadError> {
        Self::read_with_args(data, &(number_of_long_metrics, num_glyphs))
    }
}
