//! PostScript (CFF) common structures.

use std::fmt;

pub mod charstring;
pub mod dict;
mod fd_select;
mod index;
mod stack;
mod string;

pub use fd_select::FdSelect;
pub use index::Index;
pub use stack::{Number, Stack};
pub use string::{Latin1String, StringId};

use crate::{ErrorKind, ReadError};

/// Errors that are specific to PostScript processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The `off_size` field in an INDEX contained an invalid value.
    InvalidIndexOffsetSize(u8),
    /// An INDEX contained a zero offset.
    ZeroOffsetInIndex,
    /// The Name or Top DICT INDEX did not contain exactly one entry.
    InvalidIndexCount(u16),
    InvalidDictOperator(u8),
    InvalidNumber,
    /// Operands were left on the stack at the end of a DICT.
    DictOperandResidue,
    StackOverflow,
    StackUnderflow,
    InvalidStackAccess(usize),
    InvalidCharstringOperator(u8),
    UnsupportedCharstringType(i32),
    UnsupportedFdSelectFormat(u8),
    UnsupportedCharstringOperator(&'static str),
    MissingSubroutines,
    InvalidSubroutineIndex(i32),
    CharstringNestingDepthLimitExceeded,
    MissingPrivateDict,
    /// Underlying parsing error.
    Read(ReadError),
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedCharstringType(_)
            | Self::UnsupportedFdSelectFormat(_)
            | Self::UnsupportedCharstringOperator(_) => ErrorKind::UnsupportedFeature,
            Self::Read(err) => err.kind(),
            _ => ErrorKind::Format,
        }
    }
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndexOffsetSize(size) => {
                write!(f, "invalid offset size of {size} for INDEX (expected 1-4)")
            }
            Self::ZeroOffsetInIndex => {
                write!(f, "invalid offset of 0 in INDEX (must be >= 1)")
            }
            Self::InvalidIndexCount(count) => {
                write!(f, "expected an INDEX with a single entry, found {count}")
            }
            Self::InvalidDictOperator(operator) => {
                write!(f, "dict operator {operator} is invalid")
            }
            Self::InvalidNumber => write!(f, "number is in an invalid format"),
            Self::DictOperandResidue => {
                write!(f, "operands remain on the stack at the end of a DICT")
            }
            Self::StackOverflow => write!(f, "maximum stack depth exceeded"),
            Self::StackUnderflow => write!(f, "stack underflow"),
            Self::InvalidStackAccess(index) => write!(f, "invalid stack access for index {index}"),
            Self::InvalidCharstringOperator(operator) => {
                write!(f, "charstring operator {operator} is invalid")
            }
            Self::UnsupportedCharstringType(ty) => {
                write!(f, "charstring type {ty} is not supported")
            }
            Self::UnsupportedFdSelectFormat(format) => {
                write!(f, "FDSelect format {format} is not supported")
            }
            Self::UnsupportedCharstringOperator(name) => {
                write!(f, "charstring operator '{name}' is not supported")
            }
            Self::MissingSubroutines => {
                write!(f, "encountered a callsubr operator but no subroutine index was provided")
            }
            Self::InvalidSubroutineIndex(index) => {
                write!(f, "subroutine index {index} is out of bounds")
            }
            Self::CharstringNestingDepthLimitExceeded => {
                write!(
                    f,
                    "exceeded subroutine nesting depth limit {} while evaluating a charstring",
                    charstring::NESTING_DEPTH_LIMIT
                )
            }
            Self::MissingPrivateDict => write!(f, "missing private dictionary"),
            Self::Read(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert_eq!(Error::InvalidIndexCount(2).kind(), ErrorKind::Format);
        assert_eq!(
            Error::UnsupportedCharstringType(1).kind(),
            ErrorKind::UnsupportedFeature
        );
        assert_eq!(
            Error::UnsupportedFdSelectFormat(4).kind(),
            ErrorKind::UnsupportedFeature
        );
        assert_eq!(
            Error::Read(ReadError::InvalidCollectionIndex(1)).kind(),
            ErrorKind::Argument
        );
    }
}
