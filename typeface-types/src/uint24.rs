use crate::raw::Scalar;

/// 24-bit unsigned integer.
///
/// Stores Unicode variation selectors and codepoints in `cmap` format 14
/// and the three byte offsets of CFF INDEX data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uint24(u32);

impl Uint24 {
    pub const MAX: Self = Uint24(0xFF_FFFF);

    /// Creates a value, clamping anything wider than 24 bits to
    /// [`Uint24::MAX`].
    pub const fn new(raw: u32) -> Self {
        if raw > Self::MAX.0 {
            Self::MAX
        } else {
            Self(raw)
        }
    }

    /// Creates a value, or `None` if `raw` needs more than 24 bits.
    pub const fn checked_new(raw: u32) -> Option<Self> {
        if raw > Self::MAX.0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl Scalar for Uint24 {
    type Raw = [u8; 3];

    fn from_raw(raw: [u8; 3]) -> Self {
        let [hi, mid, lo] = raw;
        Self(u32::from_be_bytes([0, hi, mid, lo]))
    }

    fn to_raw(self) -> [u8; 3] {
        let [_, hi, mid, lo] = self.0.to_be_bytes();
        [hi, mid, lo]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_24_bits() {
        assert_eq!(Uint24::new(0x1_0000_00), Uint24::MAX);
        assert_eq!(Uint24::checked_new(0x1_0000_00), None);
        assert_eq!(Uint24::checked_new(0x10FFFF).map(Uint24::to_u32), Some(0x10FFFF));
    }

    #[test]
    fn variation_selector_bytes() {
        // VS17, the first supplementary variation selector
        let selector = Uint24::from_raw([0x0E, 0x01, 0x00]);
        assert_eq!(selector.to_u32(), 0xE0100);
        assert_eq!(selector.to_raw(), [0x0E, 0x01, 0x00]);
    }
}
