//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use std::collections::BTreeMap;

use types::{GlyphId, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// The largest valid Unicode scalar value.
const MAX_CODEPOINT: u32 = 0x10FFFF;

/// The platform identifier of an [`EncodingRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformId {
    Unicode,
    Macintosh,
    Iso,
    Windows,
    Custom,
    Unknown(u16),
}

impl From<u16> for PlatformId {
    fn from(raw: u16) -> Self {
        match raw {
            0 => PlatformId::Unicode,
            1 => PlatformId::Macintosh,
            2 => PlatformId::Iso,
            3 => PlatformId::Windows,
            4 => PlatformId::Custom,
            other => PlatformId::Unknown(other),
        }
    }
}

impl From<PlatformId> for u16 {
    fn from(id: PlatformId) -> Self {
        match id {
            PlatformId::Unicode => 0,
            PlatformId::Macintosh => 1,
            PlatformId::Iso => 2,
            PlatformId::Windows => 3,
            PlatformId::Custom => 4,
            PlatformId::Unknown(other) => other,
        }
    }
}

/// Result of mapping a codepoint with a variation selector.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapVariant {
    /// The variation selector should be ignored and the default mapping
    /// of the character should be used.
    UseDefault,
    /// The variant glyph mapped by a codepoint and associated variation
    /// selector.
    Variant(GlyphId),
}

/// A range of codepoints from a format 8, 12 or 13 subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapGroup {
    pub start_char_code: u32,
    /// Inclusive, and never above U+10FFFF.
    pub end_char_code: u32,
    pub start_glyph_id: u32,
    /// All codepoints map to `start_glyph_id` (format 13) instead of
    /// consecutive glyphs.
    pub constant: bool,
}

impl MapGroup {
    fn contains(&self, codepoint: u32) -> bool {
        (self.start_char_code..=self.end_char_code).contains(&codepoint)
    }

    /// The glyph for a codepoint inside the group, if it is a valid
    /// nonzero glyph identifier.
    fn glyph_id(&self, codepoint: u32) -> Option<GlyphId> {
        let glyph_id = if self.constant {
            self.start_glyph_id
        } else {
            self.start_glyph_id
                .checked_add(codepoint - self.start_char_code)?
        };
        match u16::try_from(glyph_id) {
            Ok(0) | Err(_) => None,
            Ok(glyph_id) => Some(GlyphId::new(glyph_id)),
        }
    }
}

/// A mapping from codepoints to nominal glyph identifiers, decoded from a
/// subtable of any of the formats 0, 2, 4, 6, 8, 10, 12 or 13.
///
/// Formats with explicit per-character entries are expanded into `map`;
/// the range based formats 8, 12 and 13 keep their `groups` and are
/// resolved on lookup, so a single group spanning all of Unicode costs no
/// more than any other.
///
/// Codepoints mapped to glyph 0 are omitted. When a subtable maps the same
/// codepoint more than once, the first mapping is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterMap {
    pub format: u16,
    pub language: u32,
    pub map: BTreeMap<u32, GlyphId>,
    pub groups: Vec<MapGroup>,
}

impl CharacterMap {
    fn new(format: u16, language: u32) -> Self {
        Self {
            format,
            language,
            map: BTreeMap::new(),
            groups: Vec::new(),
        }
    }

    /// The index of the first group providing a glyph for `codepoint`.
    fn group_lookup(&self, codepoint: u32) -> Option<(usize, GlyphId)> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.contains(codepoint))
            .find_map(|(ix, group)| Some((ix, group.glyph_id(codepoint)?)))
    }

    fn insert(&mut self, codepoint: u32, glyph_id: u32) {
        if glyph_id == 0 || codepoint > MAX_CODEPOINT {
            return;
        }
        if let Ok(glyph_id) = u16::try_from(glyph_id) {
            self.map.entry(codepoint).or_insert(GlyphId::new(glyph_id));
        }
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        self.map
            .get(&codepoint)
            .copied()
            .or_else(|| self.group_lookup(codepoint).map(|(_, gid)| gid))
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs.
    ///
    /// Pairs come in codepoint order unless the subtable stores its groups
    /// unsorted.
    pub fn iter(&self) -> impl Iterator<Item = (u32, GlyphId)> + '_ {
        let explicit = self.map.iter().map(|(cp, gid)| (*cp, *gid));
        let grouped = self.groups.iter().enumerate().flat_map(move |(ix, group)| {
            (group.start_char_code..=group.end_char_code).filter_map(move |cp| {
                // skip codepoints an earlier group already maps
                match self.group_lookup(cp) {
                    Some((winner, gid)) if winner == ix => Some((cp, gid)),
                    _ => None,
                }
            })
        });
        explicit.chain(grouped)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty() && self.iter().next().is_none()
    }
}

/// The [Unicode Variation Sequences](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-14-unicode-variation-sequences)
/// of a format 14 subtable, keyed by `(codepoint, selector)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariationMap {
    pub map: BTreeMap<(u32, u32), MapVariant>,
}

impl VariationMap {
    /// Maps a codepoint and variation selector to a variant glyph.
    pub fn map_variant(
        &self,
        codepoint: impl Into<u32>,
        selector: impl Into<u32>,
    ) -> Option<MapVariant> {
        self.map.get(&(codepoint.into(), selector.into())).copied()
    }

    /// Returns an iterator over all `(codepoint, selector, variant)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, MapVariant)> + '_ {
        self.map.iter().map(|((cp, sel), var)| (*cp, *sel, *var))
    }
}

/// A decoded cmap subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CmapSubtable {
    Characters(CharacterMap),
    /// Format 14
    Variations(VariationMap),
}

impl CmapSubtable {
    /// The format of the subtable.
    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Characters(map) => map.format,
            CmapSubtable::Variations(_) => 14,
        }
    }
}

/// An encoding record and the result of decoding the subtable it points to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: PlatformId,
    pub encoding_id: u16,
    /// Byte offset from the beginning of the table to the subtable.
    pub subtable_offset: u32,
    /// The decoded subtable; subtables in formats that are malformed or
    /// unsupported do not prevent the rest of the table from being read.
    pub subtable: Result<CmapSubtable, ReadError>,
}

/// [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cmap {
    pub version: u16,
    pub encoding_records: Vec<EncodingRecord>,
}

impl<'a> FontRead<'a> for Cmap {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read_u16()?;
        let num_tables = cursor.read_u16()?;
        let mut encoding_records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let platform_id = PlatformId::from(cursor.read_u16()?);
            let encoding_id = cursor.read_u16()?;
            let subtable_offset = cursor.read_u32()?;
            let subtable = data
                .split_off(subtable_offset as usize)
                .ok_or(ReadError::OutOfBounds)
                .and_then(CmapSubtable::read);
            encoding_records.push(EncodingRecord {
                platform_id,
                encoding_id,
                subtable_offset,
                subtable,
            });
        }
        Ok(Cmap {
            version,
            encoding_records,
        })
    }
}

impl Cmap {
    /// Returns the decoded subtable for the given platform and encoding.
    pub fn subtable(&self, platform_id: PlatformId, encoding_id: u16) -> Option<&CmapSubtable> {
        self.encoding_records
            .iter()
            .filter(|rec| rec.platform_id == platform_id && rec.encoding_id == encoding_id)
            .find_map(|rec| rec.subtable.as_ref().ok())
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// This uses the first character subtable that provides a mapping.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        self.encoding_records
            .iter()
            .filter_map(|rec| match &rec.subtable {
                Ok(CmapSubtable::Characters(map)) => map.map_codepoint(codepoint),
                _ => None,
            })
            .next()
    }
}

impl<'a> FontRead<'a> for CmapSubtable {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        Ok(match format {
            0 => CmapSubtable::Characters(read_format0(data)?),
            2 => CmapSubtable::Characters(read_format2(data)?),
            4 => CmapSubtable::Characters(read_format4(data)?),
            6 => CmapSubtable::Characters(read_format6(data)?),
            8 => CmapSubtable::Characters(read_format8(data)?),
            10 => CmapSubtable::Characters(read_format10(data)?),
            12 | 13 => CmapSubtable::Characters(read_segmented(data, format)?),
            14 => CmapSubtable::Variations(read_format14(data)?),
            _ => return Err(ReadError::Unsupported("cmap subtable format")),
        })
    }
}

/// Byte encoding table.
fn read_format0(data: FontData) -> Result<CharacterMap, ReadError> {
    let mut cursor = data.cursor();
    cursor.advance_by(4)?; // format, length
    let mut map = CharacterMap::new(0, cursor.read_u16()? as u32);
    for (code, glyph_id) in cursor.read_bytes(256)?.iter().enumerate() {
        map.insert(code as u32, *glyph_id as u32);
    }
    Ok(map)
}

/// High-byte mapping through table.
fn read_format2(data: FontData) -> Result<CharacterMap, ReadError> {
    const SUB_HEADERS_START: usize = 6 + 256 * 2;
    const SUB_HEADER_LEN: usize = 8;
    let mut cursor = data.cursor();
    cursor.advance_by(4)?;
    let mut map = CharacterMap::new(2, cursor.read_u16()? as u32);
    for high_byte in 0..256u32 {
        let key = cursor.read_u16()? as usize / SUB_HEADER_LEN;
        let sub_header_pos = SUB_HEADERS_START + key * SUB_HEADER_LEN;
        let mut sub_header = data.cursor_at(sub_header_pos)?;
        let first_code = sub_header.read_u16()? as u32;
        let entry_count = sub_header.read_u16()? as u32;
        let id_delta = sub_header.read_i16()?;
        let range_offset_pos = sub_header_pos + 6;
        let id_range_offset = sub_header.read_u16()? as usize;
        let codes = first_code..first_code + entry_count;
        let glyph_for = |low_byte: u32| -> Result<u32, ReadError> {
            let pos = range_offset_pos + id_range_offset + (low_byte - first_code) as usize * 2;
            let glyph_id = data.read_at::<u16>(pos)?;
            Ok(if glyph_id == 0 {
                0
            } else {
                glyph_id.wrapping_add(id_delta as u16) as u32
            })
        };
        if key == 0 {
            // single byte code, resolved through the first sub header
            if codes.contains(&high_byte) {
                map.insert(high_byte, glyph_for(high_byte)?);
            }
        } else {
            for low_byte in codes.filter(|code| *code < 256) {
                map.insert((high_byte << 8) | low_byte, glyph_for(low_byte)?);
            }
        }
    }
    Ok(map)
}

/// Segment mapping to delta values.
fn read_format4(data: FontData) -> Result<CharacterMap, ReadError> {
    let mut cursor = data.cursor();
    cursor.advance_by(4)?;
    let mut map = CharacterMap::new(4, cursor.read_u16()? as u32);
    let seg_count = cursor.read_u16()? as usize / 2;
    cursor.advance_by(6)?; // search range, entry selector, range shift
    let end_codes_pos = cursor.position()?;
    let start_codes_pos = end_codes_pos + seg_count * 2 + 2;
    let id_deltas_pos = start_codes_pos + seg_count * 2;
    let id_range_offsets_pos = id_deltas_pos + seg_count * 2;
    for i in 0..seg_count {
        let end_code = data.read_at::<u16>(end_codes_pos + i * 2)? as u32;
        let start_code = data.read_at::<u16>(start_codes_pos + i * 2)? as u32;
        let id_delta = data.read_at::<u16>(id_deltas_pos + i * 2)?;
        let range_offset_pos = id_range_offsets_pos + i * 2;
        let id_range_offset = data.read_at::<u16>(range_offset_pos)? as usize;
        for code in start_code..=end_code {
            let glyph_id = if id_range_offset == 0 {
                (code as u16).wrapping_add(id_delta)
            } else {
                let pos = range_offset_pos + id_range_offset + (code - start_code) as usize * 2;
                match data.read_at::<u16>(pos)? {
                    0 => continue,
                    glyph_id => glyph_id.wrapping_add(id_delta),
                }
            };
            map.insert(code, glyph_id as u32);
        }
    }
    Ok(map)
}

/// Trimmed table mapping.
fn read_format6(data: FontData) -> Result<CharacterMap, ReadError> {
    let mut cursor = data.cursor();
    cursor.advance_by(4)?;
    let mut map = CharacterMap::new(6, cursor.read_u16()? as u32);
    let first_code = cursor.read_u16()? as u32;
    let entry_count = cursor.read_u16()? as u32;
    for code in first_code..first_code + entry_count {
        map.insert(code, cursor.read_u16()? as u32);
    }
    Ok(map)
}

/// Mixed 16-bit and 32-bit coverage.
fn read_format8(data: FontData) -> Result<CharacterMap, ReadError> {
    let mut cursor = data.cursor();
    cursor.advance_by(8)?; // format, reserved, length
    let mut map = CharacterMap::new(8, cursor.read_u32()?);
    // the is32 bitmap only matters for decoding text, not for the mapping
    cursor.advance_by(8192)?;
    read_groups(&mut cursor, &mut map, false)?;
    Ok(map)
}

/// Trimmed array.
fn read_format10(data: FontData) -> Result<CharacterMap, ReadError> {
    let mut cursor = data.cursor();
    cursor.advance_by(8)?;
    let mut map = CharacterMap::new(10, cursor.read_u32()?);
    let start_char_code = cursor.read_u32()?;
    let num_chars = cursor.read_u32()?;
    if num_chars as usize > cursor.remaining_bytes() / 2 {
        return Err(ReadError::OutOfBounds);
    }
    for i in 0..num_chars {
        let glyph_id = cursor.read_u16()? as u32;
        if let Some(code) = start_char_code.checked_add(i) {
            map.insert(code, glyph_id);
        }
    }
    Ok(map)
}

/// Segmented coverage (format 12) and many-to-one range mappings (format 13).
fn read_segmented(data: FontData, format: u16) -> Result<CharacterMap, ReadError> {
    let mut cursor = data.cursor();
    cursor.advance_by(8)?;
    let mut map = CharacterMap::new(format, cursor.read_u32()?);
    read_groups(&mut cursor, &mut map, format == 13)?;
    Ok(map)
}

fn read_groups(
    cursor: &mut crate::Cursor,
    map: &mut CharacterMap,
    constant: bool,
) -> Result<(), ReadError> {
    let num_groups = cursor.read_u32()?;
    if num_groups as usize > cursor.remaining_bytes() / 12 {
        return Err(ReadError::OutOfBounds);
    }
    map.groups.reserve(num_groups as usize);
    for _ in 0..num_groups {
        let start_char_code = cursor.read_u32()?;
        let end_char_code = cursor.read_u32()?.min(MAX_CODEPOINT);
        let start_glyph_id = cursor.read_u32()?;
        // empty after clamping to the Unicode range
        if start_char_code > end_char_code {
            continue;
        }
        map.groups.push(MapGroup {
            start_char_code,
            end_char_code,
            start_glyph_id,
            constant,
        });
    }
    Ok(())
}

/// Unicode variation sequences.
fn read_format14(data: FontData) -> Result<VariationMap, ReadError> {
    let mut cursor = data.cursor();
    cursor.advance_by(6)?; // format, length
    let num_records = cursor.read_u32()?;
    if num_records as usize > cursor.remaining_bytes() / 11 {
        return Err(ReadError::OutOfBounds);
    }
    let mut map = BTreeMap::new();
    for _ in 0..num_records {
        let selector = cursor.read_u24()?;
        let default_uvs_offset = cursor.read_u32()? as usize;
        let non_default_uvs_offset = cursor.read_u32()? as usize;
        if default_uvs_offset != 0 {
            let mut ranges = data.cursor_at(default_uvs_offset)?;
            let count = ranges.read_u32()?;
            for _ in 0..count {
                let start = ranges.read_u24()?;
                let additional_count = ranges.read_u8()? as u32;
                for codepoint in start..=start + additional_count {
                    map.entry((codepoint, selector))
                        .or_insert(MapVariant::UseDefault);
                }
            }
        }
        if non_default_uvs_offset != 0 {
            let mut mappings = data.cursor_at(non_default_uvs_offset)?;
            let count = mappings.read_u32()?;
            for _ in 0..count {
                let codepoint = mappings.read_u24()?;
                let glyph_id = GlyphId::new(mappings.read_u16()?);
                map.entry((codepoint, selector))
                    .or_insert(MapVariant::Variant(glyph_id));
            }
        }
    }
    Ok(VariationMap { map })
}

#[cfg(test)]
mod tests {
    use typeface_test_data::{be_buffer, fonts, tables};

    use super::*;

    fn characters(data: &[u8]) -> CharacterMap {
        match CmapSubtable::read(FontData::new(data)).unwrap() {
            CmapSubtable::Characters(map) => map,
            CmapSubtable::Variations(_) => panic!("expected a character map"),
        }
    }

    fn pairs(map: &CharacterMap) -> Vec<(u32, u16)> {
        map.iter().map(|(cp, gid)| (cp, gid.to_u16())).collect()
    }

    #[test]
    fn read_records() {
        let data = fonts::truetype_cmap();
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert_eq!(cmap.encoding_records.len(), 4);
        let ids: Vec<_> = cmap
            .encoding_records
            .iter()
            .map(|rec| {
                let format = rec.subtable.as_ref().unwrap().format();
                (u16::from(rec.platform_id), rec.encoding_id, format)
            })
            .collect();
        assert_eq!(ids, [(0, 3, 4), (0, 5, 14), (3, 1, 4), (3, 10, 12)]);
        assert_eq!(cmap.map_codepoint('A'), Some(GlyphId::new(2)));
        assert_eq!(cmap.map_codepoint('Z'), None);
        let Some(CmapSubtable::Characters(full)) = cmap.subtable(PlatformId::Windows, 10) else {
            panic!("missing format 12 subtable");
        };
        assert_eq!(full.map_codepoint(0x1F600u32), Some(GlyphId::new(1)));
    }

    #[test]
    fn format0() {
        let mut glyphs = [0u8; 256];
        glyphs[0x41] = 3;
        glyphs[0x42] = 4;
        let data = be_buffer!(0u16, 262u16, 7u16).extend(glyphs);
        let map = characters(&data);
        assert_eq!(map.language, 7);
        assert_eq!(pairs(&map), [(0x41, 3), (0x42, 4)]);
    }

    #[test]
    fn format2() {
        let mut keys = [0u16; 256];
        keys[0x81] = 8;
        let data = be_buffer!(2u16, 542u16, 0u16)
            .extend(keys)
            // sub header 0: single byte codes 0x20..0x22
            .extend([0x20u16, 2, 0, 10])
            // sub header 1: second bytes 0x40..0x42, delta 1
            .extend([0x40u16, 2, 1, 6])
            .extend([3u16, 4, 7, 0]);
        let map = characters(&data);
        assert_eq!(pairs(&map), [(0x20, 3), (0x21, 4), (0x8140, 8)]);
    }

    #[test]
    fn format4_delta_and_range_offsets() {
        let data = be_buffer! {
            4u16, 38u16, 0u16,
            4u16, 0u16, 0u16, 0u16, // seg count x2, search params
            0x43u16, 0xFFFFu16,     // end codes
            0u16,                   // reserved pad
            0x41u16, 0xFFFFu16,     // start codes
            5u16, 1u16,             // deltas
            4u16, 0u16,             // range offsets
            10u16, 0u16, 20u16      // glyph ids
        };
        let map = characters(&data);
        assert_eq!(pairs(&map), [(0x41, 15), (0x43, 25)]);
    }

    #[test]
    fn format4_from_builder() {
        let data = tables::cmap_format4(&[(0x20, 3), (0x41, 2), (0x7E, 0xFFFF)]);
        let map = characters(&data);
        assert_eq!(pairs(&map), [(0x20, 3), (0x41, 2), (0x7E, 0xFFFF)]);
    }

    #[test]
    fn format6() {
        let data = be_buffer!(6u16, 16u16, 0u16, 0x30u16, 3u16, 5u16, 0u16, 6u16);
        assert_eq!(pairs(&characters(&data)), [(0x30, 5), (0x32, 6)]);
    }

    #[test]
    fn format8() {
        let data = be_buffer!(8u16, 0u16, 0u32, 0u32)
            .extend([0u8; 8192])
            .extend([1u32, 0x10000, 0x10001, 7]);
        assert_eq!(pairs(&characters(&data)), [(0x10000, 7), (0x10001, 8)]);
    }

    #[test]
    fn format10() {
        let data = be_buffer!(10u16, 0u16, 26u32, 0u32, 0x2000u32, 3u32, 4u16, 0u16, 9u16);
        assert_eq!(pairs(&characters(&data)), [(0x2000, 4), (0x2002, 9)]);
    }

    #[test]
    fn format12_and_13() {
        let groups = [(0x41, 0x43, 10), (0x1F600, 0x1F601, 20)];
        let data = tables::cmap_format12(&groups);
        assert_eq!(
            pairs(&characters(&data)),
            [(0x41, 10), (0x42, 11), (0x43, 12), (0x1F600, 20), (0x1F601, 21)]
        );
        let mut data = data;
        data[1] = 13;
        assert_eq!(
            pairs(&characters(&data)),
            [(0x41, 10), (0x42, 10), (0x43, 10), (0x1F600, 20), (0x1F601, 20)]
        );
    }

    #[test]
    fn groups_are_clamped_to_unicode() {
        let data = tables::cmap_format12(&[(0x10FFFE, 0xFFFFFFFF, 1)]);
        let map = characters(&data);
        assert_eq!(map.groups[0].end_char_code, 0x10FFFF);
        assert_eq!(pairs(&map), [(0x10FFFE, 1), (0x10FFFF, 2)]);
        // a group starting past the last codepoint is dropped
        let data = tables::cmap_format12(&[(0x110000, 0xFFFFFFFF, 1), (0x41, 0x41, 2)]);
        let map = characters(&data);
        assert_eq!(map.groups.len(), 1);
        assert_eq!(pairs(&map), [(0x41, 2)]);
    }

    #[test]
    fn full_range_groups_are_not_expanded() {
        // each group spans all of Unicode
        let groups = vec![(0, 0xFFFFFFFF, 1); 64];
        let data = tables::cmap_format12(&groups);
        let map = characters(&data);
        assert!(map.map.is_empty());
        assert_eq!(map.groups.len(), 64);
        assert_eq!(map.map_codepoint(0x41u32), Some(GlyphId::new(0x42)));
        // glyph ids past u16::MAX are not mapped
        assert_eq!(map.map_codepoint(0xFFFFu32), None);
        assert_eq!(map.map_codepoint(0x10FFFFu32), None);
        let mut data = data;
        data[1] = 13;
        let map = characters(&data);
        assert_eq!(map.map_codepoint(0x10FFFFu32), Some(GlyphId::new(1)));
        assert!(!map.is_empty());
    }

    #[test]
    fn first_mapping_wins() {
        let data = tables::cmap_format12(&[(0x41, 0x41, 1), (0x41, 0x42, 5)]);
        assert_eq!(pairs(&characters(&data)), [(0x41, 1), (0x42, 6)]);
    }

    #[test]
    fn format14() {
        let data = tables::cmap_format14(&[
            (0xFE00, vec![(0x41, 1)], vec![]),
            (0xFE01, vec![], vec![(0x4F, 2)]),
        ]);
        let CmapSubtable::Variations(map) = CmapSubtable::read(FontData::new(&data)).unwrap()
        else {
            panic!("expected variations");
        };
        assert_eq!(map.map_variant(0x41u32, 0xFE00u32), Some(MapVariant::UseDefault));
        assert_eq!(map.map_variant(0x42u32, 0xFE00u32), Some(MapVariant::UseDefault));
        assert_eq!(
            map.map_variant(0x4Fu32, 0xFE01u32),
            Some(MapVariant::Variant(GlyphId::new(2)))
        );
        assert_eq!(map.map_variant(0x4Fu32, 0xFE00u32), None);
        assert_eq!(map.iter().count(), 3);
    }

    #[test]
    fn unsupported_subtable_is_kept_as_error() {
        let data = tables::cmap(&[
            (3, 1, be_buffer!(7u16, 0u16).into_vec()),
            (3, 10, tables::cmap_format12(&[(0x41, 0x41, 3)])),
        ]);
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        let err = cmap.encoding_records[0].subtable.clone().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::UnsupportedFeature);
        assert_eq!(cmap.map_codepoint(0x41u32), Some(GlyphId::new(3)));
    }

    #[test]
    fn truncated_header() {
        let data = be_buffer!(0u16, 2u16, 3u16, 1u16);
        assert_eq!(
            Cmap::read(FontData::new(&data)),
            Err(ReadError::OutOfBounds)
        );
    }
}
