//! test data shared between the typeface crates.
//!
//! Rather than checking binary fixtures into the repository, fonts used in
//! tests are synthesised from small table builders. The [`fonts`] module
//! contains the complete fonts most tests use; the other modules hold the
//! pieces they are assembled from.

pub mod bebuffer;
pub mod cff;
pub mod fonts;
pub mod sfnt;
pub mod tables;

pub use bebuffer::BeBuffer;
