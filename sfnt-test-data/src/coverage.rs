//! coverage tables

/// Format 1, glyphs `{1, 3, 5}`.
#[rustfmt::skip]
pub static FORMAT1_ODD_GLYPHS: &[u8] = &[
    0x00, 0x01, // format 1
    0x00, 0x03, // glyphCount
    0x00, 0x01, 0x00, 0x03, 0x00, 0x05,
];

/// Format 2, glyphs `[1, 2]` and `[4, 8]`.
#[rustfmt::skip]
pub static FORMAT2_SPLIT_RANGE: &[u8] = &[
    0x00, 0x02, // format 2
    0x00, 0x02, // rangeCount
    0x00, 0x01, 0x00, 0x02, 0x00, 0x00, // 1..=2, startCoverageIndex 0
    0x00, 0x04, 0x00, 0x08, 0x00, 0x02, // 4..=8, startCoverageIndex 2
];

/// A format 1 table whose glyph array is not sorted.
///
/// This is invalid, but it turns up in real fonts and must survive a
/// round-trip untouched.
#[rustfmt::skip]
pub static FORMAT1_UNSORTED: &[u8] = &[
    0x00, 0x01,
    0x00, 0x03,
    0x00, 0x09, 0x00, 0x02, 0x00, 0x05,
];

/// A coverage table with an unknown format.
pub static BAD_FORMAT: &[u8] = &[0x00, 0x03, 0x00, 0x00];
