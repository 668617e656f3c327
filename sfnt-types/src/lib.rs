//! Common [scalar data types][data types] used in sfnt font tables.
//!
//! Every type here knows how to encode and decode itself as a fixed number of
//! big-endian bytes via the [`Scalar`] trait. The one exception to the
//! big-endian rule is described on [`ScalarLe`].
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixed;
mod glyph_id;
mod longdatetime;
mod offset;
mod raw;
mod tag;
mod uint24;


pub use fixed::Fixed;
pub use glyph_id::GlyphId16;
pub use longdatetime::LongDateTime;
pub use offset::{Offset, Offset16, Offset32};
pub use raw::{Scalar, ScalarLe};
pub use tag::{InvalidTag, Tag};
pub use uint24::Uint24;
