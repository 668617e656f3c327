//! types for working with raw big-endian bytes

/// A trait for font scalars.
///
/// Implementors can be decoded from and encoded to a fixed-length array of
/// big-endian bytes.
pub trait Scalar: Sized + Copy {
    /// The raw byte representation of this type.
    type Raw: sealed::BeByteArray;

    /// The number of bytes in the encoded form of this type.
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self::Raw>();

    /// Create an instance of this type from raw big-endian bytes
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes
    fn to_raw(self) -> Self::Raw;

    /// Attempt to read a scalar from a slice.
    ///
    /// This will always succeed if `slice.len() == Self::RAW_BYTE_LEN`, and will
    /// always return `None` otherwise.
    fn read(slice: &[u8]) -> Option<Self> {
        sealed::BeByteArray::from_slice(slice).map(Self::from_raw)
    }
}

/// A trait for scalars that are, unusually, stored in little-endian order.
///
/// Font tables are big-endian throughout. The only little-endian field this
/// crate knows about is the 32-bit unsigned integer used by a handful of
/// legacy container headers, so this is only implemented for `u32`. That
/// field is read little-endian deliberately; do not "fix" it.
pub trait ScalarLe: Scalar {
    /// Create an instance of this type from raw little-endian bytes
    fn from_raw_le(raw: Self::Raw) -> Self;

    /// Encode this type as raw little-endian bytes
    fn to_raw_le(self) -> Self::Raw;

    /// Attempt to read a little-endian scalar from a slice.
    fn read_le(slice: &[u8]) -> Option<Self> {
        sealed::BeByteArray::from_slice(slice).map(Self::from_raw_le)
    }
}

pub(crate) mod sealed {
    /// A trait for fixed-length byte arrays.
    ///
    /// This is sealed so that the set of raw representations is closed.
    pub trait BeByteArray: Copy + AsRef<[u8]> + AsMut<[u8]> + Default {
        /// Copy the bytes out of a slice of exactly the right length.
        fn from_slice(slice: &[u8]) -> Option<Self>;
    }

    impl<const N: usize> BeByteArray for [u8; N]
    where
        [u8; N]: Default,
    {
        fn from_slice(slice: &[u8]) -> Option<Self> {
            slice.try_into().ok()
        }
    }
}

macro_rules! int_scalar {
    ($ty:ty, $raw:ty) => {
        impl Scalar for $ty {
            type Raw = $raw;

            fn to_raw(self) -> $raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> $ty {
                Self::from_be_bytes(raw)
            }
        }
    };
}

/// An internal macro for implementing [`Scalar`] for a newtype over another scalar.
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl $crate::raw::Scalar for $name {
            type Raw = $raw;

            fn to_raw(self) -> $raw {
                $crate::raw::Scalar::to_raw(self.0)
            }

            fn from_raw(raw: $raw) -> Self {
                Self($crate::raw::Scalar::from_raw(raw))
            }
        }
    };
}

pub(crate) use newtype_scalar;

int_scalar!(u8, [u8; 1]);
int_scalar!(i8, [u8; 1]);
int_scalar!(u16, [u8; 2]);
int_scalar!(i16, [u8; 2]);
int_scalar!(u32, [u8; 4]);
int_scalar!(i32, [u8; 4]);
int_scalar!(i64, [u8; 8]);

impl ScalarLe for u32 {
    fn from_raw_le(raw: [u8; 4]) -> Self {
        u32::from_le_bytes(raw)
    }

    fn to_raw_le(self) -> [u8; 4] {
        self.to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_exact_len_only() {
        assert_eq!(u16::read(&[1, 2]), Some(0x0102));
        assert_eq!(u16::read(&[1]), None);
        assert_eq!(u16::read(&[1, 2, 3]), None);
        assert_eq!(i16::read(&[0xff, 0xfe]), Some(-2));
    }

    #[test]
    fn little_endian_u32() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(u32::read_le(&bytes), Some(0x0403_0201));
        assert_eq!(u32::read(&bytes), Some(0x0102_0304));
        assert_eq!(0x0403_0201u32.to_raw_le(), bytes);
    }

    #[test]
    fn raw_byte_len() {
        assert_eq!(u8::RAW_BYTE_LEN, 1);
        assert_eq!(i32::RAW_BYTE_LEN, 4);
        assert_eq!(i64::RAW_BYTE_LEN, 8);
    }
}
