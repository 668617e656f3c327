//! CFF INDEX and DICT data

/// An INDEX with no elements.
pub static EMPTY_INDEX: &[u8] = &[0x00, 0x00];

/// An INDEX holding `"a"`, `"bc"` and `"def"`.
#[rustfmt::skip]
pub static STRING_INDEX: &[u8] = &[
    0x00, 0x03,             // count
    0x01,                   // offSize
    0x01, 0x02, 0x04, 0x07, // offsets
    b'a', b'b', b'c', b'd', b'e', b'f',
];

/// A top DICT.
#[rustfmt::skip]
pub static TOP_DICT: &[u8] = &[
    0xF8, 0x1B, 0x00,                   // version: SID 391
    0x7F, 0x0C, 0x02,                   // ItalicAngle: -12
    0x1E, 0xE0, 0xA5, 0xFF, 0x0C, 0x03, // UnderlinePosition: -0.5
    0x1D, 0x00, 0x00, 0x01, 0x00, 0x11, // CharStrings: 256
    0xB8, 0xFA, 0x7C, 0x12,             // Private: 45, 1000
];

/// An INDEX holding [`TOP_DICT`].
#[rustfmt::skip]
pub static TOP_DICT_INDEX: &[u8] = &[
    0x00, 0x01,
    0x01,
    0x01, 0x17,
    0xF8, 0x1B, 0x00,
    0x7F, 0x0C, 0x02,
    0x1E, 0xE0, 0xA5, 0xFF, 0x0C, 0x03,
    0x1D, 0x00, 0x00, 0x01, 0x00, 0x11,
    0xB8, 0xFA, 0x7C, 0x12,
];
