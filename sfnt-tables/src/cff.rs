//! Building blocks of the [Compact Font Format](https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf)
//!
//! Only the INDEX and DICT containers are modelled; charstrings are treated
//! as opaque bytes.

mod dict;
mod index;

pub use dict::{operators, CffDict, DictEntry, Operand};
pub use index::{CffIndex, CffIndexBuilder, IndexElement};
