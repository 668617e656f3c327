//! Read-only views of table data

use std::io::{self, Write};
use std::ops::{Bound, RangeBounds};
use std::sync::{Arc, OnceLock};

use sfnt_types::{Scalar, ScalarLe};

use crate::error::{ReadError, WriteError};
use crate::store::ByteStore;
use crate::writable::WritableData;

/// A bounded, read-only window onto a shared [`ByteStore`].
///
/// Cloning and slicing are cheap: the underlying store is reference counted
/// and never copied. Every read is checked against the window, so a slice can
/// never see bytes outside the range it was created with.
///
/// `ReadableData` is `Send` and `Sync`. The checksum is computed at most once
/// per view, even when first requested from several threads at the same time.
#[derive(Clone, Default)]
pub struct ReadableData {
    pub(crate) store: Arc<ByteStore>,
    pub(crate) start: usize,
    pub(crate) len: usize,
    checksum: OnceLock<u32>,
    checksum_ranges: Vec<usize>,
}

impl ReadableData {
    /// A view of all the filled bytes in `store`.
    pub fn from_store(store: ByteStore) -> Self {
        let len = store.len();
        ReadableData {
            store: Arc::new(store),
            start: 0,
            len,
            checksum: OnceLock::new(),
            checksum_ranges: Vec::new(),
        }
    }

    /// A view of a copy of these bytes.
    pub fn new(bytes: &[u8]) -> Self {
        Self::from_store(ByteStore::from_vec(bytes.to_vec()))
    }

    fn with_bounds(&self, start: usize, len: usize) -> Self {
        ReadableData {
            store: self.store.clone(),
            start,
            len,
            checksum: OnceLock::new(),
            checksum_ranges: Vec::new(),
        }
    }

    /// The length of the view, in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the view has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes in this view.
    pub fn as_bytes(&self) -> &[u8] {
        &self.store.as_slice()[self.start..self.start + self.len]
    }

    /// Returns a new view of a subrange of this one, or `None` if the range
    /// is not contained in this view.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<ReadableData> {
        let (start, end) = resolve_range(&range, self.len)?;
        Some(self.with_bounds(self.start + start, end - start))
    }

    /// Returns a view of everything from `pos` to the end of this view.
    pub fn split_off(&self, pos: usize) -> Option<ReadableData> {
        self.slice(pos..)
    }

    /// Narrow this view in place to `len` bytes starting at `offset`.
    ///
    /// Any cached checksum and checksum ranges are discarded.
    pub fn bound(&mut self, offset: usize, len: usize) -> Result<(), ReadError> {
        let end = offset.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        if end > self.len {
            return Err(ReadError::OutOfBounds);
        }
        *self = self.with_bounds(self.start + offset, len);
        Ok(())
    }

    /// Narrow this view in place to start at `offset`, keeping its end.
    pub fn bound_from(&mut self, offset: usize) -> Result<(), ReadError> {
        let len = self.len.checked_sub(offset).ok_or(ReadError::OutOfBounds)?;
        self.bound(offset, len)
    }

    /// Read a big-endian scalar at `offset`.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.as_bytes()
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a **little-endian** `u32` at `offset`.
    ///
    /// This exists for the one field type that is stored little-endian in
    /// otherwise big-endian data. It is not a mistake.
    pub fn read_u32_le(&self, offset: usize) -> Result<u32, ReadError> {
        self.as_bytes()
            .get(offset..offset.saturating_add(4))
            .and_then(u32::read_le)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a big-endian `u32` that must also be a valid `i32`.
    pub fn read_u32_as_i32(&self, offset: usize) -> Result<i32, ReadError> {
        let raw = self.read_at::<u32>(offset)?;
        i32::try_from(raw).map_err(|_| ReadError::MalformedData("u32 value does not fit in i32"))
    }

    /// Copy bytes starting at `offset` into `buf`, stopping at the end of the
    /// view. Returns the number of bytes copied.
    pub fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> usize {
        let available = self.as_bytes().get(offset..).unwrap_or_default();
        let len = available.len().min(buf.len());
        buf[..len].copy_from_slice(&available[..len]);
        len
    }

    /// The checksum of this view.
    ///
    /// This is the wrapping sum of the data's big-endian `u32` words, with a
    /// trailing partial word padded with zeros. If [checksum ranges] are set,
    /// only those ranges are summed.
    ///
    /// [checksum ranges]: ReadableData::set_checksum_ranges
    pub fn checksum(&self) -> u32 {
        *self
            .checksum
            .get_or_init(|| crate::checksum::checksum(self.as_bytes(), &self.checksum_ranges))
    }

    /// Restrict the checksum to a set of ranges.
    ///
    /// `ranges` is a list of `low, high` boundary pairs. An odd final
    /// boundary extends to the end of the view. An empty list checksums the
    /// whole view. Range lengths are expected to be multiples of four.
    pub fn set_checksum_ranges(&mut self, ranges: &[usize]) {
        self.checksum_ranges = ranges.to_vec();
        self.checksum = OnceLock::new();
    }

    /// The ranges used when computing the checksum.
    pub fn checksum_ranges(&self) -> &[usize] {
        &self.checksum_ranges
    }

    /// Write the contents of this view to a stream.
    pub fn copy_to_writer(&self, writer: &mut impl Write) -> io::Result<usize> {
        self.store.copy_to_writer(self.start, self.len, writer)
    }

    /// Copy the contents of this view to the start of `dest`.
    pub fn copy_to(&self, dest: &mut WritableData) -> Result<usize, WriteError> {
        dest.copy_from(0, self)
    }
}

/// Resolve a range against a length, returning `None` if it does not fit.
pub(crate) fn resolve_range(range: &impl RangeBounds<usize>, len: usize) -> Option<(usize, usize)> {
    let start = match range.start_bound() {
        Bound::Unbounded => 0,
        Bound::Included(i) => *i,
        Bound::Excluded(i) => i.checked_add(1)?,
    };
    let end = match range.end_bound() {
        Bound::Unbounded => len,
        Bound::Included(i) => i.checked_add(1)?,
        Bound::Excluded(i) => *i,
    };
    (start <= end && end <= len).then_some((start, end))
}

impl From<Vec<u8>> for ReadableData {
    fn from(src: Vec<u8>) -> ReadableData {
        ReadableData::from_store(ByteStore::from_vec(src))
    }
}

impl From<&[u8]> for ReadableData {
    fn from(src: &[u8]) -> ReadableData {
        ReadableData::new(src)
    }
}

impl PartialEq for ReadableData {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ReadableData {}

impl std::fmt::Debug for ReadableData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadableData")
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}
