//! Mapping of characters to nominal glyph identifiers.
//!
//! The `cmap` table may contain several subtables for different platforms
//! and encodings. [`Charmap`] selects the most useful one, preferring full
//! Unicode coverage over the Basic Multilingual Plane, then Windows symbol
//! encodings and finally Macintosh Roman.
//!
//! See the [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap)
//! specification for details.

use typeface_read::{
    tables::cmap::{CharacterMap, Cmap, CmapSubtable, MapVariant, PlatformId, VariationMap},
    types::GlyphId,
};

/// Platform and encoding pairs in order of preference.
const PRIORITY: &[(PlatformId, u16)] = &[
    // Unicode full repertoire
    (PlatformId::Windows, 10),
    (PlatformId::Unicode, 6),
    (PlatformId::Unicode, 4),
    // Unicode BMP only
    (PlatformId::Windows, 1),
    (PlatformId::Unicode, 3),
    (PlatformId::Unicode, 2),
    (PlatformId::Unicode, 1),
    (PlatformId::Unicode, 0),
    // Windows symbol
    (PlatformId::Windows, 0),
    // Macintosh Roman
    (PlatformId::Macintosh, 0),
];

/// Encoding of Unicode variation sequence subtables.
const VARIATION_ENCODING: (PlatformId, u16) = (PlatformId::Unicode, 5);

/// Mapping of characters to nominal glyph identifiers.
#[derive(Clone, Debug)]
pub struct Charmap {
    cmap: Cmap,
    selected: Option<usize>,
    variations: Option<usize>,
}

impl Charmap {
    /// Selects the preferred character and variation subtables of `cmap`.
    pub fn new(cmap: Cmap) -> Self {
        let find = |platform_id: PlatformId, encoding_id: u16, want_variations: bool| {
            cmap.encoding_records.iter().position(|record| {
                record.platform_id == platform_id
                    && record.encoding_id == encoding_id
                    && matches!(
                        (&record.subtable, want_variations),
                        (Ok(CmapSubtable::Characters(_)), false)
                            | (Ok(CmapSubtable::Variations(_)), true)
                    )
            })
        };
        let selected = PRIORITY
            .iter()
            .find_map(|(platform_id, encoding_id)| find(*platform_id, *encoding_id, false));
        let variations = find(VARIATION_ENCODING.0, VARIATION_ENCODING.1, true);
        if selected.is_none() {
            log::warn!(
                "no usable cmap subtable among {} encoding records; character lookups will miss",
                cmap.encoding_records.len()
            );
        }
        Self {
            cmap,
            selected,
            variations,
        }
    }

    /// The underlying table, with every decoded subtable.
    pub fn cmap(&self) -> &Cmap {
        &self.cmap
    }

    /// Returns true if a usable character subtable was found.
    pub fn has_map(&self) -> bool {
        self.selected.is_some()
    }

    /// Returns true if a Unicode variation sequence subtable was found.
    pub fn has_variant_map(&self) -> bool {
        self.variations.is_some()
    }

    /// The platform and encoding of the selected character subtable.
    pub fn selected_encoding(&self) -> Option<(PlatformId, u16)> {
        let record = self.cmap.encoding_records.get(self.selected?)?;
        Some((record.platform_id, record.encoding_id))
    }

    fn character_map(&self) -> Option<&CharacterMap> {
        match &self.cmap.encoding_records.get(self.selected?)?.subtable {
            Ok(CmapSubtable::Characters(map)) => Some(map),
            _ => None,
        }
    }

    fn variation_map(&self) -> Option<&VariationMap> {
        match &self.cmap.encoding_records.get(self.variations?)?.subtable {
            Ok(CmapSubtable::Variations(map)) => Some(map),
            _ => None,
        }
    }

    /// Maps a character to a nominal glyph identifier.
    ///
    /// Returns `None` if the character is not mapped or no usable subtable
    /// is available.
    pub fn map(&self, ch: impl Into<u32>) -> Option<GlyphId> {
        self.character_map()?.map_codepoint(ch)
    }

    /// Returns an iterator over all mappings of codepoint to nominal glyph
    /// identifier in the selected subtable.
    pub fn mappings(&self) -> impl Iterator<Item = (u32, GlyphId)> + '_ {
        self.character_map()
            .into_iter()
            .flat_map(|map| map.iter())
    }

    /// Maps a character and variation selector to a variant glyph.
    pub fn map_variant(&self, ch: impl Into<u32>, selector: impl Into<u32>) -> Option<MapVariant> {
        self.variation_map()?.map_variant(ch, selector)
    }

    /// Returns an iterator over all `(codepoint, selector, variant)` triples
    /// of the variation sequence subtable.
    pub fn variant_mappings(&self) -> impl Iterator<Item = (u32, u32, MapVariant)> + '_ {
        self.variation_map()
            .into_iter()
            .flat_map(|map| map.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use typeface_read::{FontRef, TableProvider};
    use typeface_test_data::{fonts, tables};

    fn charmap(data: &[u8]) -> Charmap {
        Charmap::new(FontRef::new(data).unwrap().cmap().unwrap())
    }

    fn cmap(records: &[(u16, u16, Vec<u8>)]) -> Charmap {
        let data = tables::cmap(records);
        Charmap::new(typeface_read::FontRead::read(typeface_read::FontData::new(&data)).unwrap())
    }

    #[test]
    fn prefers_full_repertoire() {
        let data = fonts::simple_truetype();
        let charmap = charmap(&data);
        assert_eq!(
            charmap.selected_encoding(),
            Some((PlatformId::Windows, 10))
        );
        assert_eq!(charmap.map(0x1F600u32), Some(GlyphId::new(1)));
        assert_eq!(charmap.map('A'), Some(GlyphId::new(2)));
        assert_eq!(charmap.map('Z'), None);
        assert_eq!(charmap.mappings().count(), 5);
    }

    #[test]
    fn falls_back_to_bmp() {
        let charmap = cmap(&[
            (1, 0, tables::cmap_format4(&[(0x41, 7)])),
            (3, 1, tables::cmap_format4(&[(0x41, 3)])),
        ]);
        assert_eq!(charmap.selected_encoding(), Some((PlatformId::Windows, 1)));
        assert_eq!(charmap.map('A'), Some(GlyphId::new(3)));
    }

    #[test]
    fn macintosh_last() {
        let charmap = cmap(&[(1, 0, tables::cmap_format4(&[(0x41, 7)]))]);
        assert_eq!(
            charmap.selected_encoding(),
            Some((PlatformId::Macintosh, 0))
        );
        assert_eq!(charmap.map('A'), Some(GlyphId::new(7)));
    }

    #[test]
    fn unusable_table() {
        let charmap = cmap(&[(3, 2, tables::cmap_format4(&[(0x41, 7)]))]);
        assert!(!charmap.has_map());
        assert_eq!(charmap.selected_encoding(), None);
        assert_eq!(charmap.map('A'), None);
        assert_eq!(charmap.mappings().count(), 0);
    }

    #[test]
    fn variation_sequences() {
        let data = fonts::simple_truetype();
        let charmap = charmap(&data);
        assert!(charmap.has_variant_map());
        assert_eq!(
            charmap.map_variant('A', 0xFE00u32),
            Some(MapVariant::UseDefault)
        );
        assert_eq!(
            charmap.map_variant('O', 0xFE01u32),
            Some(MapVariant::Variant(GlyphId::new(2)))
        );
        assert_eq!(charmap.map_variant('O', 0xFE00u32), None);
        assert_eq!(charmap.variant_mappings().count(), 2);
    }
}
