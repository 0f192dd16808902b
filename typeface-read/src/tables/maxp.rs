//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

const VERSION_0_5: u32 = 0x00005000;
const VERSION_1_0: u32 = 0x00010000;

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp)
/// (maximum profile) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maxp {
    /// 0x00005000 for fonts with CFF outlines, 0x00010000 for TrueType.
    pub version: u32,
    /// The number of glyphs in the font.
    pub num_glyphs: u16,
    /// Fields present only in version 1.0 tables.
    pub truetype: Option<MaxpV1>,
}

/// The TrueType specific limits of a version 1.0 `maxp` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxpV1 {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    /// Maximum levels of recursion; 1 for simple components.
    pub max_component_depth: u16,
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read_u32()?;
        let num_glyphs = cursor.read_u16()?;
        let truetype = match version {
            VERSION_0_5 => None,
            VERSION_1_0 => Some(MaxpV1 {
                max_points: cursor.read_u16()?,
                max_contours: cursor.read_u16()?,
                max_composite_points: cursor.read_u16()?,
                max_composite_contours: cursor.read_u16()?,
                max_zones: cursor.read_u16()?,
                max_twilight_points: cursor.read_u16()?,
                max_storage: cursor.read_u16()?,
                max_function_defs: cursor.read_u16()?,
                max_instruction_defs: cursor.read_u16()?,
                max_stack_elements: cursor.read_u16()?,
                max_size_of_instructions: cursor.read_u16()?,
                max_component_elements: cursor.read_u16()?,
                max_component_depth: cursor.read_u16()?,
            }),
            other => return Err(ReadError::InvalidFormat(other as i64)),
        };
        Ok(Maxp {
            version,
            num_glyphs,
            truetype,
        })
    }
}

#[cfg(test)]
mod tests {
    use typeface_test_data::{be_buffer, tables};

    use super::*;

    #[test]
    fn versions() {
        let maxp = Maxp::read(FontData::new(&tables::maxp_v05(12))).unwrap();
        assert_eq!(maxp.num_glyphs, 12);
        assert!(maxp.truetype.is_none());

        let maxp = Maxp::read(FontData::new(&tables::maxp_v1(8, 3))).unwrap();
        assert_eq!(maxp.version, VERSION_1_0);
        assert_eq!(maxp.num_glyphs, 8);
        let v1 = maxp.truetype.unwrap();
        assert_eq!(v1.max_component_depth, 3);
        assert_eq!(v1.max_points, 64);
    }

    #[test]
    fn bad_version() {
        let data = be_buffer! { 0x00020000u32, 1u16 };
        assert_eq!(
            Maxp::read(FontData::new(&data)),
            Err(ReadError::InvalidFormat(0x00020000))
        );
        let truncated = tables::maxp_v1(8, 1);
        assert!(Maxp::read(FontData::new(&truncated[..20])).is_err());
    }
}
