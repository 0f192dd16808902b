//! The [post](https://learn.microsoft.com/en-us/typography/opentype/spec/post) table

use types::{Fixed, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'post'
pub const TAG: Tag = Tag::new(b"post");

/// The header of the [post](https://learn.microsoft.com/en-us/typography/opentype/spec/post)
/// (PostScript) table.
///
/// Glyph names stored by versions 2.0 and 2.5 are not decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Post {
    /// 0x00010000, 0x00020000, 0x00025000 or 0x00030000
    pub version: Fixed,
    /// Italic angle in counter-clockwise degrees from the vertical.
    pub italic_angle: Fixed,
    /// Suggested y-coordinate of the top of the underline.
    pub underline_position: i16,
    /// Suggested values for the underline thickness.
    pub underline_thickness: i16,
    /// Set to 0 if the font is proportionally spaced, non-zero if the font is
    /// not proportionally spaced (i.e. monospaced).
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
}

impl<'a> FontRead<'a> for Post {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(Post {
            version: cursor.read_fixed()?,
            italic_angle: cursor.read_fixed()?,
            underline_position: cursor.read_i16()?,
            underline_thickness: cursor.read_i16()?,
            is_fixed_pitch: cursor.read_u32()?,
            min_mem_type42: cursor.read_u32()?,
            max_mem_type42: cursor.read_u32()?,
            min_mem_type1: cursor.read_u32()?,
            max_mem_type1: cursor.read_u32()?,
        })
    }
}
