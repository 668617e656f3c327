//! Glyph identifiers

/// A 16-bit glyph identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct GlyphId16(u16);

impl GlyphId16 {
    /// The identifier reserved for unknown glyphs
    pub const NOTDEF: GlyphId16 = GlyphId16(0);

    pub const fn new(raw: u16) -> Self {
        GlyphId16(raw)
    }

    pub const fn to_u16(self) -> u16 {
        self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for GlyphId16 {
    fn from(value: u16) -> Self {
        GlyphId16(value)
    }
}

impl From<GlyphId16> for u32 {
    fn from(value: GlyphId16) -> Self {
        value.0 as u32
    }
}

impl std::fmt::Display for GlyphId16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GID_{}", self.0)
    }
}

crate::raw::newtype_scalar!(GlyphId16, [u8; 2]);
