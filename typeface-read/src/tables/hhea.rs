//! the [hhea (Horizontal Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use types::Tag;

pub use super::hvhea::HVhea as Hhea;

/// 'hhea'
pub const TAG: Tag = Tag::new(b"hhea");
