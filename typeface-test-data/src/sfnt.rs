//! Assembling tables into SFNT and collection files.

use std::collections::BTreeMap;

use typeface_types::{Tag, TTC_HEADER_TAG};

use crate::BeBuffer;

const TABLE_RECORD_LEN: usize = 16;
const SFNT_HEADER_LEN: usize = 12;

/// Builds an SFNT font file from a set of raw tables.
#[derive(Clone, Debug)]
pub struct SfntBuilder {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl SfntBuilder {
    pub fn new(sfnt_version: u32) -> Self {
        Self {
            sfnt_version,
            tables: BTreeMap::new(),
        }
    }

    /// Add a table, replacing any existing table with the same tag.
    pub fn add_table(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    pub fn remove_table(&mut self, tag: Tag) -> &mut Self {
        self.tables.remove(&tag);
        self
    }

    pub fn table(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(Vec::as_slice)
    }

    /// Rename a table, keeping its contents.
    pub fn rename_table(&mut self, from: Tag, to: Tag) -> &mut Self {
        if let Some(data) = self.tables.remove(&from) {
            self.tables.insert(to, data);
        }
        self
    }

    fn directory_len(&self) -> usize {
        SFNT_HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN
    }

    fn total_len(&self) -> usize {
        self.directory_len()
            + self
                .tables
                .values()
                .map(|data| padded_len(data.len()))
                .sum::<usize>()
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Build the font as if it were located at `base` in a larger file.
    ///
    /// Table offsets are always relative to the start of the file, so fonts
    /// embedded in a collection need to know their position.
    pub fn build_at(&self, base: usize) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let entry_selector = if num_tables == 0 {
            0
        } else {
            15 - num_tables.leading_zeros() as u16
        };
        let search_range = (1u16 << entry_selector) * 16;
        let range_shift = (num_tables * 16).saturating_sub(search_range);
        let mut directory = BeBuffer::new()
            .push(self.sfnt_version)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);

        let mut offset = base + self.directory_len();
        let mut body = Vec::new();
        for (tag, data) in &self.tables {
            directory = directory
                .push(*tag)
                .push(checksum(data))
                .push(offset as u32)
                .push(data.len() as u32);
            body.extend_from_slice(data);
            body.resize(padded_len(body.len()), 0);
            offset += padded_len(data.len());
        }
        let mut result = directory.into_vec();
        result.extend(body);
        result
    }
}

/// Build a `ttcf` collection containing the given fonts.
pub fn build_collection(fonts: &[&SfntBuilder]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len();
    let mut header = BeBuffer::new()
        .push(TTC_HEADER_TAG)
        .push(1u16)
        .push(0u16)
        .push(fonts.len() as u32);
    let mut body = Vec::new();
    for font in fonts {
        let offset = header_len + body.len();
        header = header.push(offset as u32);
        body.extend(font.build_at(offset));
        debug_assert_eq!(body.len() + header_len, offset + font.total_len());
    }
    let mut result = header.into_vec();
    result.extend(body);
    result
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// The standard table checksum: the sum of the big-endian u32 words in the
/// table, padded with zeros.
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_be_bytes(word)
        })
        .fold(0u32, |sum, word| sum.wrapping_add(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_layout() {
        let mut builder = SfntBuilder::new(0x00010000);
        builder
            .add_table(Tag::new(b"zzzz"), vec![1, 2, 3])
            .add_table(Tag::new(b"aaaa"), vec![4; 8]);
        let data = builder.build();
        // header + 2 records + 8 bytes + 3 bytes padded to 4
        assert_eq!(data.len(), 12 + 32 + 8 + 4);
        // records are sorted by tag
        assert_eq!(&data[12..16], b"aaaa");
        assert_eq!(&data[28..32], b"zzzz");
        // offset of the first table
        assert_eq!(&data[20..24], &44u32.to_be_bytes());
    }

    #[test]
    fn checksum_pads() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0x80]), 0x8000_0001);
    }

    #[test]
    fn collection_offsets() {
        let mut builder = SfntBuilder::new(0x00010000);
        builder.add_table(Tag::new(b"test"), vec![1, 2, 3, 4]);
        let data = build_collection(&[&builder, &builder]);
        assert_eq!(&data[..4], b"ttcf");
        let second = u32::from_be_bytes(data[16..20].try_into().unwrap()) as usize;
        assert_eq!(second, 20 + 32);
        // the table offset in the second font points past its own directory
        let table_offset =
            u32::from_be_bytes(data[second + 20..second + 24].try_into().unwrap()) as usize;
        assert_eq!(&data[table_offset..table_offset + 4], &[1, 2, 3, 4]);
    }
}
