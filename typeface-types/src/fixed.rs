//! fixed-point numerical types

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// shared between Fixed and F2Dot14
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty, $wide:ty, $raw:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction." )]
        pub struct $name($ty);

        impl $name {
            /// Minimum value.
            pub const MIN: Self = Self(<$ty>::MIN);

            /// Maximum value.
            pub const MAX: Self = Self(<$ty>::MAX);

            /// This type's smallest representable value
            pub const EPSILON: Self = Self(1);

            /// Representation of 0.0.
            pub const ZERO: Self = Self(0);

            /// Representation of 1.0.
            pub const ONE: Self = Self(1 << $fract_bits);

            const INT_MASK: $ty = !0 << $fract_bits;
            const ROUND: $ty = 1 << ($fract_bits - 1);
            const FRACT_BITS: u32 = $fract_bits;

            /// Creates a new value from the raw bit representation.
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// Returns the raw bit representation.
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Returns the nearest integer value.
            pub fn round(self) -> Self {
                Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
            }

            /// Returns the absolute value of the number.
            pub fn abs(self) -> Self {
                Self(self.0.wrapping_abs())
            }

            /// Returns the largest integer less than or equal to the number.
            pub fn floor(self) -> Self {
                Self(self.0 & Self::INT_MASK)
            }

            /// Returns the fractional part of the number.
            pub fn fract(self) -> Self {
                Self(self.0 - self.floor().0)
            }

            /// Wrapping addition.
            pub fn wrapping_add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }

            /// Wrapping subtraction.
            pub fn wrapping_sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }
        }

        // Font data is untrusted, so arithmetic wraps instead of panicking
        // in debug builds.
        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                self.wrapping_add(other)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, other: Self) {
                *self = *self + other;
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, other: Self) {
                *self = *self - other;
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                Self(self.0.wrapping_neg())
            }
        }

        impl Mul for $name {
            type Output = Self;
            /// Fixed point multiplication, rounding to nearest.
            fn mul(self, other: Self) -> Self {
                let wide = self.0 as $wide * other.0 as $wide;
                let rounded = (wide + (1 << ($fract_bits - 1))) >> $fract_bits;
                Self(rounded as $ty)
            }
        }

        impl Div for $name {
            type Output = Self;
            /// Fixed point division.
            ///
            /// Division by zero saturates to [`MAX`](Self::MAX) or
            /// [`MIN`](Self::MIN) depending on the sign of the dividend.
            fn div(self, other: Self) -> Self {
                if other.0 == 0 {
                    return if self.0 < 0 { Self::MIN } else { Self::MAX };
                }
                let wide = ((self.0 as $wide) << $fract_bits) / other.0 as $wide;
                Self(wide.clamp(<$ty>::MIN as $wide, <$ty>::MAX as $wide) as $ty)
            }
        }

        impl crate::raw::Scalar for $name {
            type Raw = $raw;
            fn from_raw(raw: $raw) -> Self {
                Self(<$ty>::from_be_bytes(raw))
            }

            fn to_raw(self) -> $raw {
                self.0.to_be_bytes()
            }
        }
    };
}

/// impl float conversion methods.
///
/// We convert to different float types in order to ensure we can roundtrip
/// without floating point error.
macro_rules! float_conv {
    ($name:ident, $to:ident, $from:ident, $ty:ty) => {
        impl $name {
            #[doc = concat!("Creates a fixed point value from a ", stringify!($ty), ".")]
            ///
            /// This operation is lossy; the float will be rounded to the nearest
            /// representable value.
            pub fn $from(x: $ty) -> Self {
                Self((x * Self::ONE.0 as $ty).round() as _)
            }

            #[doc = concat!("Returns the value as an ", stringify!($ty), ".")]
            ///
            /// This operation is lossless: all representable values can be
            /// round-tripped.
            pub fn $to(self) -> $ty {
                let int = ((self.0 & Self::INT_MASK) >> Self::FRACT_BITS) as $ty;
                let fract = (self.0 & !Self::INT_MASK) as $ty / Self::ONE.0 as $ty;
                int + fract
            }
        }

        //hack: we can losslessly go to float, so use those fmt impls
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.$to().fmt(f)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.$to().fmt(f)
            }
        }
    };
}

fixed_impl!(F2Dot14, 16, 14, i16, i32, [u8; 2]);
fixed_impl!(Fixed, 32, 16, i32, i64, [u8; 4]);
float_conv!(F2Dot14, to_f32, from_f32, f32);
float_conv!(Fixed, to_f64, from_f64, f64);

impl Fixed {
    /// Creates a fixed point value from an integer, wrapping values outside
    /// of the 16-bit range.
    pub const fn from_i32(value: i32) -> Self {
        Self(value.wrapping_shl(16))
    }

    /// Returns the integer part of the value, rounding toward negative
    /// infinity.
    pub const fn to_i32(self) -> i32 {
        self.0 >> 16
    }

    /// Converts a 2.14 value to 16.16.
    pub const fn from_f2dot14(value: F2Dot14) -> Self {
        Self((value.0 as i32) << 2)
    }
}

impl F2Dot14 {
    /// Returns the value as a 16.16 fixed point number.
    pub const fn to_fixed(self) -> Fixed {
        Fixed::from_f2dot14(self)
    }
}
