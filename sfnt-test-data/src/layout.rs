//! offset tables from the layout tables

/// A feature list with `kern -> [0]` and `liga -> [1, 2]`, laid out the way
/// the builders lay it out.
#[rustfmt::skip]
pub static FEATURE_LIST: &[u8] = &[
    0x00, 0x02,                         // featureCount
    b'k', b'e', b'r', b'n', 0x00, 0x0E, // kern @ 14
    b'l', b'i', b'g', b'a', 0x00, 0x14, // liga @ 20
    // kern
    0x00, 0x00, // featureParams
    0x00, 0x01, // lookupIndexCount
    0x00, 0x00,
    // liga
    0x00, 0x00,
    0x00, 0x02,
    0x00, 0x01, 0x00, 0x02,
];

/// The same features as [`FEATURE_LIST`], with the records out of order and
/// a duplicated `kern` record sharing its feature with the first.
#[rustfmt::skip]
pub static FEATURE_LIST_MALFORMED: &[u8] = &[
    0x00, 0x03,
    b'l', b'i', b'g', b'a', 0x00, 0x1A, // liga @ 26
    b'k', b'e', b'r', b'n', 0x00, 0x14, // kern @ 20
    b'k', b'e', b'r', b'n', 0x00, 0x14, // kern @ 20, again
    // kern
    0x00, 0x00,
    0x00, 0x01,
    0x00, 0x00,
    // liga
    0x00, 0x00,
    0x00, 0x02,
    0x00, 0x01, 0x00, 0x02,
];

/// A feature list with a null feature offset and a feature without lookups.
#[rustfmt::skip]
pub static FEATURE_LIST_WITH_EMPTIES: &[u8] = &[
    0x00, 0x03,
    b'a', b'a', b'l', b't', 0x00, 0x14, // aalt @ 20
    b'c', b'c', b'm', b'p', 0x00, 0x00, // ccmp, null
    b'k', b'e', b'r', b'n', 0x00, 0x18, // kern @ 24
    // aalt
    0x00, 0x00,
    0x00, 0x00,
    // kern
    0x00, 0x00,
    0x00, 0x01,
    0x00, 0x07,
];

/// Mark glyph sets `{1, 3}` and `[10, 20]`.
#[rustfmt::skip]
pub static MARK_GLYPH_SETS: &[u8] = &[
    0x00, 0x01,             // format
    0x00, 0x02,             // markGlyphSetCount
    0x00, 0x00, 0x00, 0x0C, // coverage @ 12
    0x00, 0x00, 0x00, 0x14, // coverage @ 20
    // coverage format 1
    0x00, 0x01, 0x00, 0x02, 0x00, 0x01, 0x00, 0x03,
    // coverage format 2
    0x00, 0x02, 0x00, 0x01, 0x00, 0x0A, 0x00, 0x14, 0x00, 0x00,
];

/// Two mark glyph sets that share one coverage table.
#[rustfmt::skip]
pub static MARK_GLYPH_SETS_SHARED: &[u8] = &[
    0x00, 0x01,
    0x00, 0x02,
    0x00, 0x00, 0x00, 0x0C,
    0x00, 0x00, 0x00, 0x0C,
    0x00, 0x01, 0x00, 0x01, 0x00, 0x07,
];
