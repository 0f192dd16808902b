//! The Horizontal/Vertical Header tables.
//!
//! The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
//! and [vhea](https://docs.microsoft.com/en-us/typography/opentype/spec/vhea)
//! tables have the same structure and so we define them in the same module.

use types::Fixed;

use crate::{FontData, FontRead, ReadError};

/// The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
/// or [vhea](https://docs.microsoft.com/en-us/typography/opentype/spec/vhea)
/// table.
///
/// In `vhea`, the ascender and descender fields hold the vertical typographic
/// ascent and descent, and the side bearing fields refer to the top and
/// bottom of the glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HVhea {
    /// 1.0 for `hhea`; 1.0 or 1.1 for `vhea`.
    pub version: Fixed,
    /// Typographic ascent.
    pub ascender: i16,
    /// Typographic descent.
    pub descender: i16,
    /// Typographic line gap. Negative values are treated as zero.
    pub line_gap: i16,
    /// Maximum advance width or height value in the metrics table.
    pub advance_max: u16,
    pub min_leading_bearing: i16,
    pub min_trailing_bearing: i16,
    pub max_extent: i16,
    /// Used to calculate the slope of the cursor (rise/run); 1 for vertical.
    pub caret_slope_rise: i16,
    /// 0 for vertical.
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    /// 0 for current format.
    pub metric_data_format: i16,
    /// Number of long metric entries in the corresponding metrics table.
    pub number_of_long_metrics: u16,
}

impl<'a> FontRead<'a> for HVhea {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read_fixed()?;
        let ascender = cursor.read_i16()?;
        let descender = cursor.read_i16()?;
        let line_gap = cursor.read_i16()?;
        let advance_max = cursor.read_u16()?;
        let min_leading_bearing = cursor.read_i16()?;
        let min_trailing_bearing = cursor.read_i16()?;
        let max_extent = cursor.read_i16()?;
        let caret_slope_rise = cursor.read_i16()?;
        let caret_slope_run = cursor.read_i16()?;
        let caret_offset = cursor.read_i16()?;
        // four reserved fields
        cursor.advance_by(8)?;
        Ok(HVhea {
            version,
            ascender,
            descender,
            line_gap,
            advance_max,
            min_leading_bearing,
            min_trailing_bearing,
            max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format: cursor.read_i16()?,
            number_of_long_metrics: cursor.read_u16()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use typeface_test_data::tables;

    use super::*;

    #[test]
    fn read_hhea_and_vhea() {
        let params = tables::HVhea {
            ascender: 850,
            descender: -250,
            line_gap: 30,
            advance_max: 1200,
            caret_slope_rise: 1,
            caret_slope_run: 0,
            number_of_long_metrics: 3,
        };
        let hhea = HVhea::read(FontData::new(&tables::hhea(&params))).unwrap();
        assert_eq!(hhea.version, Fixed::ONE);
        assert_eq!(hhea.ascender, 850);
        assert_eq!(hhea.descender, -250);
        assert_eq!(hhea.line_gap, 30);
        assert_eq!(hhea.advance_max, 1200);
        assert_eq!(hhea.max_extent, 1200);
        assert_eq!(hhea.caret_slope_rise, 1);
        assert_eq!(hhea.number_of_long_metrics, 3);

        let vhea = HVhea::read(FontData::new(&tables::vhea(&params))).unwrap();
        assert_eq!(vhea.version, Fixed::from_f64(1.0625));
        assert_eq!(vhea.number_of_long_metrics, 3);
    }

    #[test]
    fn truncated() {
        let data = tables::hhea(&Default::default());
        assert!(HVhea::read(FontData::new(&data[..34])).is_err());
    }
}
