//! Error types for loading a typeface and its glyphs.

use thiserror::Error;

use typeface_read::{types::GlyphId, ErrorKind};

pub use typeface_read::{tables::postscript::Error as CffError, ReadError};

/// Errors that may occur when loading a typeface or querying its glyphs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Error occurred when reading font data.
    #[error("{0}")]
    Read(#[from] ReadError),
    /// Error occurred while reading the `CFF ` table or evaluating a
    /// charstring.
    #[error("{0}")]
    PostScript(#[from] CffError),
    /// The glyph identifier is not less than the glyph count and glyph
    /// substitution is disabled.
    #[error("glyph {0} is out of range")]
    GlyphOutOfRange(GlyphId),
    /// A composite glyph references itself, directly or through other
    /// components.
    #[error("cycle detected when loading composite component {0}")]
    CompositeCycle(GlyphId),
    /// Composite glyphs were nested too deeply.
    #[error("nesting limit exceeded when loading composite component {0}")]
    CompositeDepthExceeded(GlyphId),
    /// An anchor point had an invalid index.
    #[error("invalid anchor point index ({1}) for composite glyph {0}")]
    InvalidAnchorPoint(GlyphId, u16),
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Read(err) => err.kind(),
            Self::PostScript(err) => err.kind(),
            Self::GlyphOutOfRange(_) => ErrorKind::Argument,
            Self::CompositeCycle(_)
            | Self::CompositeDepthExceeded(_)
            | Self::InvalidAnchorPoint(..) => ErrorKind::Format,
        }
    }
}
