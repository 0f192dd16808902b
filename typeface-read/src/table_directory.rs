//! The [table directory] and [collection header]
//!
//! [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
//! [collection header]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#ttc-header

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// The tables that every font handled by this crate must contain.
pub const REQUIRED_TABLES: [Tag; 7] = [
    Tag::new(b"cmap"),
    Tag::new(b"head"),
    Tag::new(b"hhea"),
    Tag::new(b"hmtx"),
    Tag::new(b"maxp"),
    Tag::new(b"name"),
    Tag::new(b"post"),
];

/// The OpenType [Table Directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDirectory {
    /// 0x00010000 or 0x4F54544F
    pub sfnt_version: u32,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    /// Table records, in the order they appear in the file.
    pub table_records: Vec<TableRecord>,
}

/// Record for a table in a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRecord {
    /// Table identifier.
    pub tag: Tag,
    /// Checksum for the table.
    pub checksum: u32,
    /// Offset from the beginning of the font data.
    pub offset: u32,
    /// Length of the table.
    pub length: u32,
}

impl TableDirectory {
    pub fn num_tables(&self) -> u16 {
        self.table_records.len() as u16
    }

    /// Returns the record for the table with the given tag.
    ///
    /// An exact match is preferred; failing that, tags are compared
    /// ignoring ASCII case.
    pub fn find(&self, tag: Tag) -> Option<&TableRecord> {
        self.table_records
            .iter()
            .find(|rec| rec.tag == tag)
            .or_else(|| {
                self.table_records
                    .iter()
                    .find(|rec| rec.tag.eq_ignore_ascii_case(&tag))
            })
    }

    /// Ensures that every table in [`REQUIRED_TABLES`] is present.
    pub fn validate_required(&self) -> Result<(), ReadError> {
        match REQUIRED_TABLES.iter().find(|tag| self.find(**tag).is_none()) {
            Some(tag) => Err(ReadError::TableIsMissing(*tag)),
            None => Ok(()),
        }
    }
}

impl TableRecord {
    /// The byte range of the table within the font data.
    pub fn data<'a>(&self, font_data: FontData<'a>) -> Option<FontData<'a>> {
        font_data.slice_len(self.offset as usize, self.length as usize)
    }
}

impl<'a> FontRead<'a> for TableDirectory {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Err(ReadError::EmptyInput);
        }
        let mut cursor = data.cursor();
        let sfnt_version = cursor.read_u32()?;
        let num_tables = cursor.read_u16()?;
        let search_range = cursor.read_u16()?;
        let entry_selector = cursor.read_u16()?;
        let range_shift = cursor.read_u16()?;
        let table_records = (0..num_tables)
            .map(|_| {
                Ok(TableRecord {
                    tag: cursor.read()?,
                    checksum: cursor.read_u32()?,
                    offset: cursor.read_u32()?,
                    length: cursor.read_u32()?,
                })
            })
            .collect::<Result<_, ReadError>>()?;
        Ok(TableDirectory {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            table_records,
        })
    }
}

/// [TTC Header](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#ttc-header)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TtcHeader {
    /// Font Collection ID string: "ttcf"
    pub ttc_tag: Tag,
    pub major_version: u16,
    pub minor_version: u16,
    /// Offsets to each font's table directory from the beginning of the file.
    pub table_directory_offsets: Vec<u32>,
}

impl TtcHeader {
    pub fn num_fonts(&self) -> u32 {
        self.table_directory_offsets.len() as u32
    }
}

impl<'a> FontRead<'a> for TtcHeader {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ttc_tag = cursor.read()?;
        if ttc_tag != types::TTC_HEADER_TAG {
            return Err(ReadError::InvalidTtc(ttc_tag));
        }
        let major_version = cursor.read_u16()?;
        let minor_version = cursor.read_u16()?;
        let num_fonts = cursor.read_u32()?;
        // each offset needs four bytes; reject counts the data can't hold
        if num_fonts as usize > cursor.remaining_bytes() / 4 {
            return Err(ReadError::OutOfBounds);
        }
        let table_directory_offsets = (0..num_fonts)
            .map(|_| cursor.read_u32())
            .collect::<Result<_, _>>()?;
        Ok(TtcHeader {
            ttc_tag,
            major_version,
            minor_version,
            table_directory_offsets,
        })
    }
}

#[cfg(test)]
mod tests {
    use typeface_test_data::{be_buffer, fonts};
    use types::TT_SFNT_VERSION;

    use super::*;

    #[test]
    fn read_directory() {
        let data = fonts::simple_truetype();
        let dir = TableDirectory::read(FontData::new(&data)).unwrap();
        assert_eq!(dir.sfnt_version, TT_SFNT_VERSION);
        assert_eq!(dir.num_tables(), 10);
        assert_eq!(dir.search_range, 128);
        assert_eq!(dir.entry_selector, 3);
        let head = dir.find(Tag::new(b"head")).unwrap();
        assert_eq!(head.length, 54);
        assert_eq!(head.data(FontData::new(&data)).unwrap().len(), 54);
        assert!(dir.validate_required().is_ok());
    }

    #[test]
    fn find_ignores_case_as_fallback() {
        let data = be_buffer! {
            TT_SFNT_VERSION, 2u16, 32u16, 1u16, 0u16,
            (Tag::new(b"OS/2")), 0u32, 0u32, 0u32,
            (Tag::new(b"CMAP")), 0u32, 0u32, 0u32
        };
        let dir = TableDirectory::read(FontData::new(&data)).unwrap();
        assert_eq!(dir.find(Tag::new(b"cmap")).unwrap().tag, Tag::new(b"CMAP"));
        assert!(dir.find(Tag::new(b"os/2")).is_some());
        assert!(dir.find(Tag::new(b"glyf")).is_none());
    }

    #[test]
    fn missing_required_table() {
        for tag in REQUIRED_TABLES {
            let mut builder = fonts::truetype_builder();
            builder.remove_table(tag);
            let data = builder.build();
            let dir = TableDirectory::read(FontData::new(&data)).unwrap();
            let err = dir.validate_required().unwrap_err();
            assert_eq!(err, ReadError::TableIsMissing(tag));
            assert_eq!(err.kind(), crate::ErrorKind::Format);
        }
    }

    #[test]
    fn truncated_directory() {
        let data = be_buffer! { TT_SFNT_VERSION, 3u16, 0u16, 0u16, 0u16 };
        assert_eq!(
            TableDirectory::read(FontData::new(&data)),
            Err(ReadError::OutOfBounds)
        );
        assert_eq!(
            TableDirectory::read(FontData::new(&[])),
            Err(ReadError::EmptyInput)
        );
    }

    #[test]
    fn ttc_header() {
        let data = be_buffer! { (Tag::new(b"ttcf")), 2u16, 0u16, 2u32, 20u32, 40u32 };
        let header = TtcHeader::read(FontData::new(&data)).unwrap();
        assert_eq!(header.num_fonts(), 2);
        assert_eq!(header.major_version, 2);
        assert_eq!(header.table_directory_offsets, vec![20, 40]);

        let bad_count = be_buffer! { (Tag::new(b"ttcf")), 1u16, 0u16, 1000u32, 20u32 };
        assert!(TtcHeader::read(FontData::new(&bad_count)).is_err());
        assert!(matches!(
            TtcHeader::read(FontData::new(&fonts::simple_truetype())),
            Err(ReadError::InvalidTtc(_))
        ));
    }
}
