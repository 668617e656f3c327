use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// A four-byte table, feature or script tag.
///
/// Tags are nominally printable ASCII, padded with trailing spaces. Fonts in
/// the wild contain tags that violate this, and those must still round-trip,
/// so construction from raw bytes never validates; use [`Tag::new_checked`]
/// or [`Tag::validate`] where conformance matters.
///
/// Tags order by their big-endian integer value, which is the order required
/// for tag-keyed record lists.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct Tag([u8; 4]);

/// An error representing an invalid tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    /// The tag was not between 1 and 4 bytes in length.
    InvalidLength(usize),
    /// A byte outside of the printable ASCII range `(0x20..=0x7E)`, or a
    /// leading space.
    InvalidByte { pos: usize, byte: u8 },
    /// A non-space byte following a space.
    ByteAfterSpace { pos: usize },
}

impl Tag {
    /// Construct a `Tag` from raw bytes, without validation.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Create a tag from between one and four printable ASCII bytes.
    ///
    /// Shorter inputs are padded with spaces.
    pub fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [b' '; 4];
        raw[..src.len()].copy_from_slice(src);
        check_bytes(&raw)?;
        Ok(Tag(raw))
    }

    /// Construct a tag from a `u32` holding its big-endian value.
    pub const fn from_u32(src: u32) -> Self {
        Self(src.to_be_bytes())
    }

    /// The tag as a big-endian `u32`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Check that this tag is printable ASCII, has no leading space, and has
    /// no characters after its first space.
    pub fn validate(self) -> Result<(), InvalidTag> {
        check_bytes(&self.0)
    }
}

fn check_bytes(bytes: &[u8; 4]) -> Result<(), InvalidTag> {
    let mut seen_space = false;
    for (pos, byte) in bytes.iter().copied().enumerate() {
        match byte {
            b' ' if pos == 0 => return Err(InvalidTag::InvalidByte { pos, byte }),
            b' ' => seen_space = true,
            0..=0x1F | 0x7F.. => return Err(InvalidTag::InvalidByte { pos, byte }),
            _ if seen_space => return Err(InvalidTag::ByteAfterSpace { pos }),
            _ => (),
        }
    }
    Ok(())
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> [u8; 4] {
        self.0
    }

    fn from_raw(raw: [u8; 4]) -> Self {
        Self(raw)
    }
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// a meaningless placeholder value.
impl Default for Tag {
    fn default() -> Self {
        Tag([b' '; 4])
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidLength(len) => write!(f, "Invalid length ({len})"),
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "Invalid byte 0x{byte:X} at index {pos}")
            }
            InvalidTag::ByteAfterSpace { pos } => {
                write!(f, "Non-space character at index {pos} after first space")
            }
        }
    }
}

impl std::error::Error for InvalidTag {}

// human-readable formats get a string, everything else gets the raw bytes.
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            std::str::from_utf8(&self.0)
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 4]>::deserialize(deserializer).map(Tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_construction() {
        assert!(Tag::new_checked(b"").is_err());
        assert!(Tag::new_checked(b"abcde").is_err());
        assert!(Tag::new_checked(b" bc").is_err());
        assert_eq!(
            Tag::new_checked(b"b c"),
            Err(InvalidTag::ByteAfterSpace { pos: 2 })
        );
        assert_eq!(Tag::new_checked(b"kern"), Ok(Tag::new(b"kern")));
        assert_eq!(Tag::new_checked(b"cv"), Ok(Tag::new(b"cv  ")));
        assert!(Tag::new_checked(&[0x7F]).is_err());
    }

    #[test]
    fn raw_tags_are_not_validated() {
        let tag = Tag::new(&[0, 1, 2, 3]);
        assert!(tag.validate().is_err());
        assert_eq!(tag.to_string(), "{0x00}{0x01}{0x02}{0x03}");
    }

    #[test]
    fn ordering_matches_u32() {
        let mut tags = [Tag::new(b"liga"), Tag::new(b"Liga"), Tag::new(b"kern")];
        tags.sort();
        assert_eq!(tags, [Tag::new(b"Liga"), Tag::new(b"kern"), Tag::new(b"liga")]);
        assert!(tags.windows(2).all(|w| w[0].to_u32() < w[1].to_u32()));
        assert_eq!(Tag::from_u32(0x6b65_726e), "kern");
    }
}
