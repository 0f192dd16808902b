//! Reading TrueType, OpenType and CFF font data
//!
//! This crate decodes the binary structures of an SFNT font file: the
//! [table directory][table-directory] (and collection header), the metric
//! tables, the character map, TrueType glyph records and the Compact Font
//! Format with its Type2 charstring interpreter.
//!
//! Higher level access (scaled metrics, glyph outlines as path geometry) is
//! provided by the `typeface` crate.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use typeface_read::{FontRef, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! // Single fonts only. for font collections (.ttc) use FontRef::from_index
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let head = font.head().expect("missing 'head' table");
//! let maxp = font.maxp().expect("missing 'maxp' table");
//!
//! println!("{} units per em, {} glyphs", head.units_per_em, maxp.num_glyphs);
//! ```
//!
//! [table-directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod read;
pub mod table_directory;
mod table_provider;
pub mod tables;

pub use font_data::{Cursor, FontData};
pub use read::{ErrorKind, FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use table_directory::{TableDirectory, TableRecord, TtcHeader};
pub use table_provider::TableProvider;

/// Public re-export of the typeface-types crate.
pub extern crate typeface_types as types;

use types::{Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TT_SFNT_VERSION};

#[derive(Clone, Debug)]
/// Reference to the content of a font or font collection file.
pub enum FileRef<'a> {
    /// A single font.
    Font(FontRef<'a>),
    /// A collection of fonts.
    Collection(CollectionRef<'a>),
}

impl<'a> FileRef<'a> {
    /// Creates a new reference to a file representing a font or font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Ok(if let Ok(collection) = CollectionRef::new(data) {
            Self::Collection(collection)
        } else {
            Self::Font(FontRef::new(data)?)
        })
    }

    /// Returns an iterator over the fonts contained in the file.
    pub fn fonts(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let (iter_one, iter_two) = match self {
            Self::Font(font) => (Some(Ok(font.clone())), None),
            Self::Collection(collection) => (None, Some(collection.iter())),
        };
        iter_two.into_iter().flatten().chain(iter_one)
    }
}

/// Reference to the content of a font collection file.
#[derive(Clone, Debug)]
pub struct CollectionRef<'a> {
    data: FontData<'a>,
    header: TtcHeader,
}

impl<'a> CollectionRef<'a> {
    /// Creates a new reference to a font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let header = TtcHeader::read(data)?;
        Ok(Self { data, header })
    }

    /// Returns the number of fonts in the collection.
    pub fn len(&self) -> u32 {
        self.header.num_fonts()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the collection header.
    pub fn header(&self) -> &TtcHeader {
        &self.header
    }

    /// Returns the font in the collection at the specified index.
    pub fn get(&self, index: u32) -> Result<FontRef<'a>, ReadError> {
        let offset = *self
            .header
            .table_directory_offsets
            .get(index as usize)
            .ok_or(ReadError::InvalidCollectionIndex(index))? as usize;
        let table_dir_data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        FontRef::with_table_directory(
            self.data,
            TableDirectory::read(table_dir_data)?,
            Some(index),
        )
    }

    /// Returns an iterator over the fonts in the collection.
    pub fn iter(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).map(move |ix| copy.get(ix))
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Clone, Debug)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    pub table_directory: TableDirectory,
    /// The index of this font in a TrueType collection
    ttc_index: Option<u32>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single font (not a font collection) and must begin with a
    /// [table directory] to be considered valid.
    ///
    /// To load a font from a font collection, use [`FontRef::from_index`] instead.
    ///
    /// [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        Self::with_table_directory(data, TableDirectory::read(data)?, None)
    }

    /// Creates a new reference to an in-memory font at the specified index
    /// backed by the given data.
    ///
    /// This accepts either font collection (ttc) or single font (ttf/otf)
    /// files. If a single font file is provided, the index parameter must be 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        let file = FileRef::new(data)?;
        match file {
            FileRef::Font(font) => {
                if index == 0 {
                    Ok(font)
                } else {
                    Err(ReadError::InvalidCollectionIndex(index))
                }
            }
            FileRef::Collection(collection) => collection.get(index),
        }
    }

    /// Returns the underlying font data.
    ///
    /// This is the base from which tables are loaded, meaning that for
    /// TrueType collection files, this will be the entire font file data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// If the font is in a TrueType collection (ttc) file, returns the index
    /// of the font in that collection.
    pub fn ttc_index(&self) -> Option<u32> {
        self.ttc_index
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_directory
            .find(tag)
            .and_then(|record| record.data(self.data))
    }

    /// Returns an iterator over all of the available fonts in
    /// the given font data.
    pub fn fonts(
        data: &'a [u8],
    ) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let count = match FileRef::new(data) {
            Ok(FileRef::Font(_)) => 1,
            Ok(FileRef::Collection(ttc)) => ttc.len(),
            _ => 0,
        };
        (0..count).map(|idx| FontRef::from_index(data, idx))
    }

    fn with_table_directory(
        data: FontData<'a>,
        table_directory: TableDirectory,
        ttc_index: Option<u32>,
    ) -> Result<Self, ReadError> {
        if [TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION]
            .contains(&table_directory.sfnt_version)
        {
            Ok(FontRef {
                data,
                table_directory,
                ttc_index,
            })
        } else {
            Err(ReadError::InvalidSfnt(table_directory.sfnt_version))
        }
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use typeface_test_data::{fonts, sfnt};
    use types::Tag;

    use crate::{FileRef, FontRef, ReadError, TableProvider};

    fn collection() -> Vec<u8> {
        sfnt::build_collection(&[
            &fonts::truetype_builder(),
            &fonts::cff_builder(&fonts::cff_spec()),
        ])
    }

    #[test]
    fn file_ref_non_collection() {
        let data = fonts::simple_truetype();
        assert!(matches!(FileRef::new(&data), Ok(FileRef::Font(_))));
    }

    #[test]
    fn file_ref_collection() {
        let data = collection();
        let Ok(FileRef::Collection(collection)) = FileRef::new(&data) else {
            panic!("Expected a collection");
        };
        assert_eq!(2, collection.len());
        assert!(!collection.is_empty());
        assert_eq!(collection.header().major_version, 1);
    }

    #[test]
    fn font_ref_fonts_iter() {
        assert_eq!(FontRef::fonts(&fonts::simple_truetype()).count(), 1);
        assert_eq!(FontRef::fonts(&collection()).count(), 2);
        assert_eq!(FontRef::fonts(b"NOT_A_FONT").count(), 0);
    }

    #[test]
    fn ttc_index() {
        let data = collection();
        for (idx, font) in FontRef::fonts(&data).map(|font| font.unwrap()).enumerate() {
            assert_eq!(font.ttc_index(), Some(idx as u32));
        }
        let single = fonts::simple_truetype();
        assert!(FontRef::new(&single).unwrap().ttc_index().is_none());
    }

    #[test]
    fn collection_members_read_their_own_tables() {
        let data = collection();
        let truetype = FontRef::from_index(&data, 0).unwrap();
        let cff = FontRef::from_index(&data, 1).unwrap();
        assert!(truetype.table_data(Tag::new(b"glyf")).is_some());
        assert!(truetype.table_data(Tag::new(b"CFF ")).is_none());
        assert!(cff.table_data(Tag::new(b"CFF ")).is_some());
        assert_eq!(truetype.maxp().unwrap().num_glyphs, 8);
        assert_eq!(cff.maxp().unwrap().num_glyphs, 5);
    }

    #[test]
    fn invalid_collection_index() {
        let data = collection();
        assert_eq!(
            FontRef::from_index(&data, 2).unwrap_err(),
            ReadError::InvalidCollectionIndex(2)
        );
        let single = fonts::simple_truetype();
        assert_eq!(
            FontRef::from_index(&single, 1).unwrap_err(),
            ReadError::InvalidCollectionIndex(1)
        );
        assert!(FontRef::from_index(&single, 0).is_ok());
    }

    #[test]
    fn invalid_sfnt_version() {
        let mut data = fonts::simple_truetype();
        data[..4].copy_from_slice(b"wOF2");
        assert_eq!(
            FontRef::new(&data).unwrap_err(),
            ReadError::InvalidSfnt(u32::from_be_bytes(*b"wOF2"))
        );
    }

    #[test]
    fn missing_table_is_reported() {
        let mut builder = fonts::truetype_builder();
        builder.remove_table(Tag::new(b"OS/2"));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(
            font.os2().unwrap_err(),
            ReadError::TableIsMissing(Tag::new(b"OS/2"))
        );
    }
}
