//! Parsing for CFF FDSelect tables.

use types::GlyphId;

use super::Error;
use crate::FontData;

/// Maps glyph identifiers to font DICT indices in a CID-keyed font.
///
/// See "19 FDSelect" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>
#[derive(Clone, Debug)]
pub enum FdSelect<'a> {
    /// One byte per glyph.
    Format0(&'a [u8]),
    /// Runs of glyphs sharing a font DICT.
    Format3 {
        /// Packed `(first: u16, fd: u8)` records.
        ranges: &'a [u8],
        /// One past the last glyph covered by the final range.
        sentinel: u16,
    },
}

const RANGE3_SIZE: usize = 3;

impl<'a> FdSelect<'a> {
    /// Reads an FDSelect structure covering `num_glyphs` glyphs.
    pub fn new(data: FontData<'a>, num_glyphs: u16) -> Result<Self, Error> {
        let mut cursor = data.cursor();
        let format = cursor.read::<u8>()?;
        match format {
            0 => Ok(Self::Format0(cursor.read_bytes(num_glyphs as usize)?)),
            3 => {
                let n_ranges = cursor.read::<u16>()? as usize;
                let ranges = cursor.read_bytes(n_ranges * RANGE3_SIZE)?;
                let sentinel = cursor.read::<u16>()?;
                Ok(Self::Format3 { ranges, sentinel })
            }
            _ => Err(Error::UnsupportedFdSelectFormat(format)),
        }
    }

    pub fn format(&self) -> u8 {
        match self {
            Self::Format0(_) => 0,
            Self::Format3 { .. } => 3,
        }
    }

    /// Returns the associated font DICT index for the given glyph identifier.
    pub fn font_index(&self, glyph_id: GlyphId) -> Option<u16> {
        let gid = glyph_id.to_u16();
        match self {
            Self::Format0(fds) => fds.get(gid as usize).map(|fd| *fd as u16),
            Self::Format3 { ranges, sentinel } => {
                if gid >= *sentinel {
                    return None;
                }
                let first = |ix: usize| {
                    let rec = &ranges[ix * RANGE3_SIZE..];
                    u16::from_be_bytes([rec[0], rec[1]])
                };
                // count the ranges starting at or before gid
                let (mut lo, mut hi) = (0, ranges.len() / RANGE3_SIZE);
                while lo < hi {
                    let mid = (lo + hi) / 2;
                    if first(mid) <= gid {
                        lo = mid + 1;
                    } else {
                        hi = mid;
                    }
                }
                let ix = lo.checked_sub(1)?;
                ranges.get(ix * RANGE3_SIZE + 2).map(|fd| *fd as u16)
            }
        }
    }
}
