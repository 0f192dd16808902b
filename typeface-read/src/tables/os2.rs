//! The [os2](https://docs.microsoft.com/en-us/typography/opentype/spec/os2) table

use types::Tag;

use crate::{Cursor, FontData, FontRead, ReadError};

/// 'OS/2'
pub const TAG: Tag = Tag::new(b"OS/2");

/// OS/2 [selection flags](https://learn.microsoft.com/en-us/typography/opentype/spec/os2#fsselection)
pub mod selection {
    pub const ITALIC: u16 = 0x0001;
    pub const UNDERSCORE: u16 = 0x0002;
    pub const NEGATIVE: u16 = 0x0004;
    pub const OUTLINED: u16 = 0x0008;
    pub const STRIKEOUT: u16 = 0x0010;
    pub const BOLD: u16 = 0x0020;
    pub const REGULAR: u16 = 0x0040;
    /// The typographic metrics should be used for line layout.
    pub const USE_TYPO_METRICS: u16 = 0x0080;
    pub const WWS: u16 = 0x0100;
    pub const OBLIQUE: u16 = 0x0200;
}

/// The [OS/2](https://docs.microsoft.com/en-us/typography/opentype/spec/os2)
/// (OS/2 and Windows Metrics) table
///
/// Fields introduced after version 0 are `None` when the table version does
/// not include them. Some old Apple fonts have version 0 tables that end
/// before the typographic metrics; those fields are also `None` in that case.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Os2 {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: u16,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    pub s_family_class: i16,
    pub panose_10: [u8; 10],
    pub ul_unicode_range: [u32; 4],
    pub ach_vend_id: Tag,
    pub fs_selection: u16,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
    pub s_typo_ascender: Option<i16>,
    pub s_typo_descender: Option<i16>,
    pub s_typo_line_gap: Option<i16>,
    pub us_win_ascent: Option<u16>,
    pub us_win_descent: Option<u16>,
    /// Version 1 and later.
    pub ul_code_page_range: Option<[u32; 2]>,
    /// Version 2 and later.
    pub sx_height: Option<i16>,
    pub s_cap_height: Option<i16>,
    pub us_default_char: Option<u16>,
    pub us_break_char: Option<u16>,
    pub us_max_context: Option<u16>,
    /// Version 5 and later.
    pub us_lower_optical_point_size: Option<u16>,
    pub us_upper_optical_point_size: Option<u16>,
}

impl Os2 {
    pub fn selection(&self, flag: u16) -> bool {
        self.fs_selection & flag != 0
    }
}

fn read_array<const N: usize, T: types::Scalar + Default + Copy>(
    cursor: &mut Cursor,
) -> Result<[T; N], ReadError> {
    let mut result = [T::default(); N];
    for item in result.iter_mut() {
        *item = cursor.read()?;
    }
    Ok(result)
}

impl<'a> FontRead<'a> for Os2 {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read_u16()?;
        let x_avg_char_width = cursor.read_i16()?;
        let us_weight_class = cursor.read_u16()?;
        let us_width_class = cursor.read_u16()?;
        let fs_type = cursor.read_u16()?;
        let [y_subscript_x_size, y_subscript_y_size, y_subscript_x_offset, y_subscript_y_offset] =
            read_array::<4, i16>(&mut cursor)?;
        let [y_superscript_x_size, y_superscript_y_size, y_superscript_x_offset, y_superscript_y_offset] =
            read_array::<4, i16>(&mut cursor)?;
        let y_strikeout_size = cursor.read_i16()?;
        let y_strikeout_position = cursor.read_i16()?;
        let s_family_class = cursor.read_i16()?;
        let panose_10 = read_array(&mut cursor)?;
        let ul_unicode_range = read_array(&mut cursor)?;
        let ach_vend_id = cursor.read()?;
        let fs_selection = cursor.read_u16()?;
        let us_first_char_index = cursor.read_u16()?;
        let us_last_char_index = cursor.read_u16()?;

        let mut os2 = Os2 {
            version,
            x_avg_char_width,
            us_weight_class,
            us_width_class,
            fs_type,
            y_subscript_x_size,
            y_subscript_y_size,
            y_subscript_x_offset,
            y_subscript_y_offset,
            y_superscript_x_size,
            y_superscript_y_size,
            y_superscript_x_offset,
            y_superscript_y_offset,
            y_strikeout_size,
            y_strikeout_position,
            s_family_class,
            panose_10,
            ul_unicode_range,
            ach_vend_id,
            fs_selection,
            us_first_char_index,
            us_last_char_index,
            s_typo_ascender: None,
            s_typo_descender: None,
            s_typo_line_gap: None,
            us_win_ascent: None,
            us_win_descent: None,
            ul_code_page_range: None,
            sx_height: None,
            s_cap_height: None,
            us_default_char: None,
            us_break_char: None,
            us_max_context: None,
            us_lower_optical_point_size: None,
            us_upper_optical_point_size: None,
        };
        if version == 0 && cursor.remaining_bytes() == 0 {
            return Ok(os2);
        }
        os2.s_typo_ascender = Some(cursor.read_i16()?);
        os2.s_typo_descender = Some(cursor.read_i16()?);
        os2.s_typo_line_gap = Some(cursor.read_i16()?);
        os2.us_win_ascent = Some(cursor.read_u16()?);
        os2.us_win_descent = Some(cursor.read_u16()?);
        if version >= 1 {
            os2.ul_code_page_range = Some(read_array(&mut cursor)?);
        }
        if version >= 2 {
            os2.sx_height = Some(cursor.read_i16()?);
            os2.s_cap_height = Some(cursor.read_i16()?);
            os2.us_default_char = Some(cursor.read_u16()?);
            os2.us_break_char = Some(cursor.read_u16()?);
            os2.us_max_context = Some(cursor.read_u16()?);
        }
        if version >= 5 {
            os2.us_lower_optical_point_size = Some(cursor.read_u16()?);
            os2.us_upper_optical_point_size = Some(cursor.read_u16()?);
        }
        Ok(os2)
    }
}
