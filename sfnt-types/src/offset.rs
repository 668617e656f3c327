//! Offsets to subtables

use crate::raw::Scalar;

/// A trait for the different offset widths.
///
/// Offsets are unsigned byte distances from some documented base, usually
/// the start of the table containing them. Zero is the null offset.
pub trait Offset: Scalar + std::fmt::Debug {
    /// The encoded width of this offset type, in bytes.
    const WIDTH: usize;

    /// Create an offset from a `u32`, returning `None` if it does not fit.
    fn try_from_u32(raw: u32) -> Option<Self>;

    /// The offset as a `u32`.
    fn to_u32(self) -> u32;

    /// `true` if this is the null (zero) offset.
    fn is_null(self) -> bool {
        self.to_u32() == 0
    }

    /// The offset as a `usize`, or `None` if it is null.
    fn non_null(self) -> Option<usize> {
        match self.to_u32() {
            0 => None,
            off => Some(off as usize),
        }
    }
}

macro_rules! impl_offset {
    ($name:ident, $bits:literal, $rawty:ty, $width:literal) => {
        #[doc = concat!("A ", stringify!($bits), "-bit offset to a subtable.")]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name($rawty);

        impl $name {
            /// Create a new offset.
            pub const fn new(raw: $rawty) -> Self {
                Self(raw)
            }

            /// The null offset.
            pub const fn null() -> Self {
                Self(0)
            }
        }

        crate::raw::newtype_scalar!($name, [u8; $width]);

        impl Offset for $name {
            const WIDTH: usize = $width;

            fn try_from_u32(raw: u32) -> Option<Self> {
                <$rawty>::try_from(raw).ok().map(Self)
            }

            fn to_u32(self) -> u32 {
                self.0 as u32
            }
        }
    };
}

impl_offset!(Offset16, 16, u16, 2);
impl_offset!(Offset32, 32, u32, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_and_overflow() {
        assert_eq!(Offset16::WIDTH, Offset16::RAW_BYTE_LEN);
        assert_eq!(Offset32::WIDTH, 4);
        assert_eq!(Offset16::try_from_u32(0xffff), Some(Offset16::new(0xffff)));
        assert_eq!(Offset16::try_from_u32(0x1_0000), None);
        assert_eq!(Offset32::try_from_u32(0x1_0000).map(Offset::to_u32), Some(0x1_0000));
    }

    #[test]
    fn null_offsets() {
        assert!(Offset16::null().is_null());
        assert_eq!(Offset32::new(0).non_null(), None);
        assert_eq!(Offset16::new(12).non_null(), Some(12));
    }
}
