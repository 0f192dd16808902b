//! the [vhea (Vertical Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/vhea) table

use types::Tag;

pub use super::hvhea::HVhea as Vhea;

/// 'vhea'
pub const TAG: Tag = Tag::new(b"vhea");
