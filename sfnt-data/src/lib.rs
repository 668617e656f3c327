//! Reading and writing the raw bytes of sfnt tables.
//!
//! The types in this crate sit between an owned buffer of bytes and the
//! typed tables built on top of it:
//!
//! - [`ByteStore`] owns the bytes. It is either fixed-capacity or growable.
//! - [`ReadableData`] and [`WritableData`] are bounded windows onto a store.
//!   Slicing a window never copies, and never escapes the parent window.
//! - [`RecordList`] is a `u16` count followed by that many fixed-length
//!   [`Record`]s, the building block of most offset-addressed tables.
//!
//! All multi-byte values are big-endian, with one exception documented on
//! [`ReadableData::read_u32_le`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod checksum;
mod error;
mod readable;
mod records;
mod search;
mod store;
mod writable;

#[cfg(test)]
#[path = "tests/test_views.rs"]
mod test_views;

#[cfg(test)]
#[path = "tests/test_records.rs"]
mod test_records;

/// Public re-export of the sfnt-types crate.
pub use sfnt_types as types;

pub use error::{ReadError, WriteError};
pub use readable::ReadableData;
pub use records::{KeyedRecord, OffsetRecord, Record, RecordKey, RecordList};
pub use store::{ByteStore, COPY_CHUNK_LEN};
pub use writable::WritableData;
