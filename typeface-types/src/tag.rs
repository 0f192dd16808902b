use std::fmt::{Debug, Display, Formatter};

/// An OpenType tag.
///
/// A tag is a 4-byte array where each byte is usually in the printable ASCII
/// range `(0x20..=0x7E)`. This is not enforced, since invalid tags occur in
/// existing fonts and need to be representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Construct a new `Tag` from a big-endian `u32`.
    pub const fn from_u32(src: u32) -> Self {
        Self::from_be_bytes(src.to_be_bytes())
    }

    /// Create a tag from raw big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Return the memory representation of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Returns the tag as a big-endian `u32`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Compares two tags, ignoring ASCII case.
    pub fn eq_ignore_ascii_case(&self, other: &Tag) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<&[u8]> for Tag {
    fn eq(&self, other: &&[u8]) -> bool {
        self.0.as_slice() == *other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{:02X}}}", byte)?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({})", self)
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn from_raw(raw: [u8; 4]) -> Self {
        Self(raw)
    }

    fn to_raw(self) -> [u8; 4] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Tag::new(b"glyf").to_string(), "glyf");
        assert_eq!(Tag::new(b"OS/2").to_string(), "OS/2");
        assert_eq!(Tag::new(&[b'a', 0x01, b'b', b' ']).to_string(), "a{0x01}b ");
    }

    #[test]
    fn case_insensitive() {
        assert!(Tag::new(b"CFF ").eq_ignore_ascii_case(&Tag::new(b"cff ")));
        assert!(!Tag::new(b"cmap").eq_ignore_ascii_case(&Tag::new(b"cvt ")));
    }

    #[test]
    fn u32_round_trip() {
        let tag = Tag::from_u32(0x74727565);
        assert_eq!(tag, "true");
        assert_eq!(tag.to_u32(), 0x74727565);
    }
}
