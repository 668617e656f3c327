/// 24-bit unsigned integer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct Uint24(u32);

impl Uint24 {
    /// The smallest value that can be represented by this integer type.
    pub const MIN: Self = Uint24(0);

    /// The largest value that can be represented by this integer type.
    pub const MAX: Self = Uint24(0xff_ffff);

    /// Create from a u32. Saturates on overflow.
    pub const fn new(raw: u32) -> Uint24 {
        if raw > Self::MAX.0 {
            Self::MAX
        } else {
            Uint24(raw)
        }
    }

    /// Create from a u32, returning `None` if the value overflows.
    pub const fn checked_new(raw: u32) -> Option<Uint24> {
        if raw > Self::MAX.0 {
            None
        } else {
            Some(Uint24(raw))
        }
    }

    /// Returns this value as an unsigned 32-bit integer.
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }

    pub const fn from_be_bytes(bytes: [u8; 3]) -> Self {
        Uint24((bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32)
    }
}

impl crate::raw::Scalar for Uint24 {
    type Raw = [u8; 3];

    fn to_raw(self) -> [u8; 3] {
        self.to_be_bytes()
    }

    fn from_raw(raw: [u8; 3]) -> Self {
        Self::from_be_bytes(raw)
    }
}

impl From<Uint24> for u32 {
    fn from(src: Uint24) -> u32 {
        src.0
    }
}

impl From<Uint24> for usize {
    fn from(src: Uint24) -> usize {
        src.0 as usize
    }
}

impl std::fmt::Display for Uint24 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn constructor() {
        assert_eq!(Uint24::MAX, Uint24::new(u32::MAX));
        assert!(Uint24::checked_new(u32::MAX).is_none());
        assert_eq!(Uint24::checked_new(0x12_3456).map(Uint24::to_u32), Some(0x12_3456));
    }

    #[test]
    fn be_bytes() {
        let bytes = [0xff, 0b1010_1010, 0b1100_1100];
        let val = Uint24::from_be_bytes(bytes);
        assert_eq!(val.to_be_bytes(), bytes);
        assert_eq!(Uint24::read(&bytes), Some(val));
        assert_eq!(Uint24::RAW_BYTE_LEN, 3);
    }
}
