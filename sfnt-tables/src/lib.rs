//! Building and rewriting sfnt tables.
//!
//! Every table has an immutable, parsed form and a builder. Builders made
//! from existing data start out *unexpanded*: until something asks to edit
//! them they write their source bytes back untouched, including any
//! structural oddities. Once expanded, a builder writes a canonical layout.
//!
//! Writing is a two step process described by [`TableBuilder`]: the builder
//! is first sized, which is where empty subtables are pruned, and then
//! serialized. [`TableBuilder::build`] does both and parses the result.
//!
//! ```
//! use sfnt_tables::{coverage::CoverageBuilder, types::GlyphId16, TableBuilder};
//!
//! let mut builder: CoverageBuilder = [1u16, 3, 5].into_iter().map(GlyphId16::new).collect();
//! let coverage = builder.build().unwrap();
//! assert_eq!(coverage.format(), 1);
//! assert_eq!(coverage.coverage_index(GlyphId16::new(5)), Some(2));
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cff;
pub mod coverage;
mod error;
pub mod feature;
pub mod mark_glyph_sets;
pub mod offset_table;
mod range_set;
mod table;

#[cfg(test)]
#[path = "tests/test_passthrough.rs"]
mod test_passthrough;

#[cfg(test)]
#[path = "tests/test_canonical.rs"]
mod test_canonical;

#[cfg(test)]
#[path = "tests/test_coverage.rs"]
mod test_coverage;

#[cfg(test)]
#[path = "tests/test_cff.rs"]
mod test_cff;

/// Public re-export of the sfnt-data crate.
pub use sfnt_data as data;
/// Public re-export of the sfnt-types crate.
pub use sfnt_data::types;

pub use error::Error;
pub use offset_table::{OffsetLayout, OffsetTable, OffsetTableBuilder};
pub use table::{SerializedSize, TableBuilder};
