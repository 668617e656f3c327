//! fixed-point numerical types

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// 32-bit signed fixed point number with 16 bits of fraction (16.16).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// Minimum value.
    pub const MIN: Self = Self(i32::MIN);

    /// Maximum value.
    pub const MAX: Self = Self(i32::MAX);

    /// This type's smallest representable value
    pub const EPSILON: Self = Self(1);

    /// Representation of 0.0.
    pub const ZERO: Self = Self(0);

    /// Representation of 1.0.
    pub const ONE: Self = Self(1 << Self::FRACT_BITS);

    const FRACT_BITS: u32 = 16;
    const INT_MASK: i32 = !0 << Self::FRACT_BITS;

    /// Creates a new fixed point value from the underlying bit representation.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the underlying bit representation of the value.
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Creates a fixed point value from an integer, saturating on overflow.
    pub const fn from_i32(value: i32) -> Self {
        Self(value.saturating_mul(1 << Self::FRACT_BITS))
    }

    /// Returns the integer part of the value, rounding towards negative infinity.
    pub const fn to_i32(self) -> i32 {
        self.0 >> Self::FRACT_BITS
    }

    /// Creates a fixed point value from a 64-bit float, rounding to the
    /// nearest representable value.
    pub fn from_f64(value: f64) -> Self {
        Self((value * 65536.0).round() as i32)
    }

    /// Returns the value as a 64-bit float.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    /// Returns the largest integer less than or equal to the number.
    pub const fn floor(self) -> Self {
        Self(self.0 & Self::INT_MASK)
    }

    /// Returns the fractional part of the number.
    pub const fn fract(self) -> Self {
        Self(self.0 - self.floor().0)
    }

    /// Wrapping addition.
    pub const fn wrapping_add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    /// Saturating addition.
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(i32::from_be_bytes(bytes))
    }
}

crate::raw::newtype_scalar!(Fixed, [u8; 4]);

impl Add for Fixed {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Fixed {
    type Output = Self;
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_f64().fmt(f)
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn one_and_a_half() {
        let bytes = [0x00, 0x01, 0x80, 0x00];
        let value = Fixed::read(&bytes).unwrap();
        assert_eq!(value.to_f64(), 1.5);
        assert_eq!(value.to_i32(), 1);
        assert_eq!(value.fract(), Fixed::from_f64(0.5));
        assert_eq!(value.to_raw(), bytes);
    }

    #[test]
    fn negative_values_floor_down() {
        let value = Fixed::from_f64(-1.25);
        assert_eq!(value.to_bits(), -0x0001_4000);
        assert_eq!(value.floor(), Fixed::from_i32(-2));
        assert_eq!(-value, Fixed::from_f64(1.25));
    }

    #[test]
    fn arithmetic() {
        let mut value = Fixed::ONE;
        value += Fixed::from_f64(0.5);
        value -= Fixed::EPSILON;
        assert_eq!(value.to_bits(), 0x0001_7fff);
        assert_eq!(Fixed::MAX.saturating_add(Fixed::ONE), Fixed::MAX);
        assert_eq!(Fixed::from_i32(i32::MAX), Fixed::MAX);
    }
}
