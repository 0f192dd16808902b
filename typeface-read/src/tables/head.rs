//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{BoundingBox, Fixed, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The `macStyle` bits of the [`Head`] table.
pub mod mac_style {
    pub const BOLD: u16 = 0x0001;
    pub const ITALIC: u16 = 0x0002;
    pub const UNDERLINE: u16 = 0x0004;
    pub const OUTLINE: u16 = 0x0008;
    pub const SHADOW: u16 = 0x0010;
    pub const CONDENSED: u16 = 0x0020;
    pub const EXTENDED: u16 = 0x0040;
}

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Head {
    pub major_version: u16,
    pub minor_version: u16,
    /// Set by font manufacturer.
    pub font_revision: Fixed,
    /// To compute: set it to 0, sum the entire font as uint32, then
    /// store 0xB1B0AFBA - sum.
    pub checksum_adjustment: u32,
    pub flags: u16,
    /// Set to a value from 16 to 16384.
    pub units_per_em: u16,
    /// Number of seconds since 12:00 midnight that started January 1st 1904
    /// in GMT/UTC time zone.
    pub created: i64,
    pub modified: i64,
    /// Bounds of the union of all glyph bounding boxes.
    pub bbox: BoundingBox<i16>,
    pub mac_style: u16,
    /// Smallest readable size in pixels.
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version = cursor.read_u16()?;
        let minor_version = cursor.read_u16()?;
        let font_revision = cursor.read_fixed()?;
        let checksum_adjustment = cursor.read_u32()?;
        if cursor.read_u32()? != MAGIC_NUMBER {
            return Err(ReadError::MalformedData("bad magic number in head table"));
        }
        let flags = cursor.read_u16()?;
        let units_per_em = cursor.read_u16()?;
        if units_per_em == 0 {
            return Err(ReadError::MalformedData("units per em must not be zero"));
        }
        let created = cursor.read_i64()?;
        let modified = cursor.read_i64()?;
        let bbox = BoundingBox {
            x_min: cursor.read_i16()?,
            y_min: cursor.read_i16()?,
            x_max: cursor.read_i16()?,
            y_max: cursor.read_i16()?,
        };
        Ok(Head {
            major_version,
            minor_version,
            font_revision,
            checksum_adjustment,
            flags,
            units_per_em,
            created,
            modified,
            bbox,
            mac_style: cursor.read_u16()?,
            lowest_rec_ppem: cursor.read_u16()?,
            font_direction_hint: cursor.read_i16()?,
            index_to_loc_format: cursor.read_i16()?,
            glyph_data_format: cursor.read_i16()?,
        })
    }
}

impl Head {
    pub fn is_bold(&self) -> bool {
        self.mac_style & mac_style::BOLD != 0
    }

    pub fn is_italic(&self) -> bool {
        self.mac_style & mac_style::ITALIC != 0
    }
}
