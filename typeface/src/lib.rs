//! Metrics, character mapping and glyph outlines for TrueType and OpenType
//! fonts.
//!
//! This crate sits above the low level parsing provided by
//! [`typeface-read`](raw). A [`Typeface`] validates a font on construction
//! and then answers em-relative metric queries, maps characters to glyphs
//! and produces scaled outlines as [`PathGeometry`] from either `glyf` or
//! `CFF ` data.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use typeface::{GlyphId, Typeface};
//!
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let typeface = Typeface::new(&font_bytes).unwrap();
//! println!("{} glyphs", typeface.glyph_count());
//! let outline = typeface.glyph_outline(GlyphId::new(0), 64.0).unwrap();
//! println!("{outline}");
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Expose our "raw" underlying parser crate.
pub extern crate typeface_read as raw;

pub mod charmap;
pub mod geometry;
pub mod metrics;
pub mod outline;

mod error;
mod typeface;

pub use error::{CffError, Error, ReadError};
pub use geometry::{FillRule, PathFigure, PathGeometry, PathSegment};
pub use outline::{GeometryPen, OutlineFormat, OutlinePen, PathElement};
pub use typeface::{LoadOptions, Typeface};

/// Type for a glyph identifier.
pub type GlyphId = typeface_read::types::GlyphId;

/// Type for a 4-byte tag used to identify font tables.
pub type Tag = typeface_read::types::Tag;
