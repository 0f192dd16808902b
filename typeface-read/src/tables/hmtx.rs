//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::Tag;

pub use super::hvmtx::HVmtx as Hmtx;

/// 'hmtx'
pub const TAG: Tag = Tag::new(b"hmtx");
