//! The contract shared by every table builder

use std::iter::Sum;
use std::ops::Add;

use sfnt_data::{ReadError, ReadableData, WritableData, WriteError};

use crate::error::Error;

/// The number of bytes a builder expects to write.
///
/// A size is *fixed* when it is exact. A size that is not fixed is a
/// provisional magnitude: the builder's true length still depends on values
/// that have not been decided yet (for instance an offset whose target has
/// not been placed). Provisional magnitudes are still useful for layout, and
/// as a capacity hint.
///
/// Adding sizes sums their lengths; the result is fixed only if every addend
/// was fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerializedSize {
    pub len: usize,
    pub fixed: bool,
}

impl SerializedSize {
    /// The size of a table that will not be written at all.
    pub const ZERO: SerializedSize = SerializedSize::exact(0);

    pub const fn exact(len: usize) -> Self {
        SerializedSize { len, fixed: true }
    }

    pub const fn provisional(len: usize) -> Self {
        SerializedSize { len, fixed: false }
    }

    pub const fn is_zero(&self) -> bool {
        self.len == 0
    }
}

impl Default for SerializedSize {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for SerializedSize {
    type Output = SerializedSize;

    fn add(self, rhs: SerializedSize) -> SerializedSize {
        SerializedSize {
            len: self.len + rhs.len,
            fixed: self.fixed && rhs.fixed,
        }
    }
}

impl Sum for SerializedSize {
    fn sum<I: Iterator<Item = SerializedSize>>(iter: I) -> Self {
        iter.fold(SerializedSize::ZERO, Add::add)
    }
}

/// A mutable builder for some table type.
///
/// Builders are created either from existing data, in which case they start
/// out *unexpanded* and reproduce that data exactly until edited, or from
/// nothing, for new content.
///
/// Serialization is two-pass: [`size_to_serialize`] must run before
/// [`serialize`], since sizing is where a builder decides what it is going
/// to write. Builders that compose child builders size and serialize their
/// children from within their own passes.
///
/// [`size_to_serialize`]: TableBuilder::size_to_serialize
/// [`serialize`]: TableBuilder::serialize
pub trait TableBuilder: Sized {
    /// The immutable table this builder produces.
    type Table;

    /// Create a builder that wraps existing table data.
    ///
    /// Empty data means the table is absent.
    fn from_data(data: ReadableData) -> Self;

    /// The length of the table that starts at the beginning of `data`.
    ///
    /// This is used to bound the data of a subtable addressed by an offset.
    fn measure(data: &ReadableData) -> Result<usize, ReadError>;

    /// Compute the number of bytes this builder will write.
    ///
    /// A size of zero means the table will not be written at all, and
    /// parents should drop any reference to it.
    fn size_to_serialize(&mut self) -> SerializedSize;

    /// `true` if the builder is in a state that can be serialized.
    fn ready_to_serialize(&self) -> bool {
        true
    }

    /// Write the table at the start of `data`, returning the number of bytes
    /// written.
    fn serialize(&mut self, data: &mut WritableData) -> Result<usize, WriteError>;

    /// Interpret serialized bytes as the built table.
    fn read_table(data: ReadableData) -> Result<Self::Table, ReadError>;

    /// Serialize the current state of this builder into a new table.
    ///
    /// The builder is not consumed; it can be edited and built again.
    fn build(&mut self) -> Result<Self::Table, Error> {
        if !self.ready_to_serialize() {
            return Err(Error::NotReady);
        }
        let size = self.size_to_serialize();
        let mut data = if size.fixed {
            WritableData::new_fixed(size.len)
        } else {
            log::debug!("building with provisional size {}", size.len);
            WritableData::new_growable(size.len.max(1))
        };
        let written = self.serialize(&mut data)?;
        if size.fixed && written != size.len {
            return Err(Error::SizeMismatch {
                expected: size.len,
                actual: written,
            });
        }
        let data = data.into_readable();
        let data = data.slice(..written).ok_or(Error::SizeMismatch {
            expected: written,
            actual: data.len(),
        })?;
        Ok(Self::read_table(data)?)
    }
}
