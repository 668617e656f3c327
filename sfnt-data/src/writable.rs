//! Writable views of table data

use std::cell::RefCell;
use std::ops::{Bound, RangeBounds};
use std::rc::Rc;

use sfnt_types::{Scalar, ScalarLe};

use crate::error::{ReadError, WriteError};
use crate::readable::ReadableData;
use crate::store::ByteStore;

/// A bounded, writable window onto a [`ByteStore`].
///
/// Like [`ReadableData`], slicing never copies; all slices of one
/// `WritableData` write into the same store. A view may be bounded on both
/// sides, or have an open top, in which case writes are limited only by the
/// store itself (and grow a growable store).
///
/// Writable views are for a single writer and are neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct WritableData {
    store: Rc<RefCell<ByteStore>>,
    start: usize,
    bound_len: Option<usize>,
}

impl WritableData {
    /// An open-topped view of `store`.
    pub fn from_store(store: ByteStore) -> Self {
        WritableData {
            store: Rc::new(RefCell::new(store)),
            start: 0,
            bound_len: None,
        }
    }

    /// A view over a new fixed store of `len` bytes.
    pub fn new_fixed(len: usize) -> Self {
        let mut data = Self::from_store(ByteStore::fixed(len));
        data.bound_len = Some(len);
        data
    }

    /// A view over a new growable store.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_hint` is zero.
    pub fn new_growable(capacity_hint: usize) -> Self {
        Self::from_store(ByteStore::growable(capacity_hint))
    }

    /// The length of this view.
    ///
    /// For a bounded view this is the bound. For an open-topped view it is
    /// the extent of the store that has been written, from the start of the
    /// view.
    pub fn len(&self) -> usize {
        match self.bound_len {
            Some(len) => len,
            None => self.store.borrow().len().saturating_sub(self.start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if this view has no upper bound.
    pub fn is_open(&self) -> bool {
        self.bound_len.is_none()
    }

    /// A view of a subrange of this one.
    ///
    /// Slicing an open-topped view with an unbounded end produces another
    /// open-topped view.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<WritableData> {
        let start = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(i) => *i,
            Bound::Excluded(i) => i.checked_add(1)?,
        };
        let end = match range.end_bound() {
            Bound::Unbounded => None,
            Bound::Included(i) => Some(i.checked_add(1)?),
            Bound::Excluded(i) => Some(*i),
        };
        let bound_len = match (self.bound_len, end) {
            (Some(len), None) => Some(len.checked_sub(start)?),
            (Some(len), Some(end)) if end <= len => Some(end.checked_sub(start)?),
            (Some(_), Some(_)) => return None,
            (None, Some(end)) => Some(end.checked_sub(start)?),
            (None, None) => None,
        };
        Some(WritableData {
            store: self.store.clone(),
            start: self.start + start,
            bound_len,
        })
    }

    /// An open-ended slice starting at `pos`.
    pub fn split_off(&self, pos: usize) -> Option<WritableData> {
        self.slice(pos..)
    }

    /// Narrow this view in place to `len` bytes starting at `offset`.
    pub fn bound(&mut self, offset: usize, len: usize) -> Result<(), WriteError> {
        *self = self
            .slice(offset..offset.checked_add(len).ok_or(WriteError::OutOfBounds)?)
            .ok_or(WriteError::OutOfBounds)?;
        Ok(())
    }

    /// Narrow this view in place to start at `offset`, keeping the top as is.
    pub fn bound_from(&mut self, offset: usize) -> Result<(), WriteError> {
        *self = self.split_off(offset).ok_or(WriteError::OutOfBounds)?;
        Ok(())
    }

    fn check_write(&self, offset: usize, len: usize) -> Result<usize, WriteError> {
        let end = offset.checked_add(len).ok_or(WriteError::OutOfBounds)?;
        match self.bound_len {
            Some(bound) if end > bound => Err(WriteError::OutOfBounds),
            _ => Ok(self.start + offset),
        }
    }

    /// Write `bytes` at `offset`, returning the number of bytes written.
    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<usize, WriteError> {
        let pos = self.check_write(offset, bytes.len())?;
        self.store.borrow_mut().put_bytes(pos, bytes)?;
        Ok(bytes.len())
    }

    /// Write a big-endian scalar at `offset`.
    pub fn write_at<T: Scalar>(&mut self, offset: usize, value: T) -> Result<usize, WriteError> {
        self.write_bytes(offset, value.to_raw().as_ref())
    }

    /// Write a **little-endian** `u32`; see [`ReadableData::read_u32_le`].
    pub fn write_u32_le(&mut self, offset: usize, value: u32) -> Result<usize, WriteError> {
        self.write_bytes(offset, &value.to_raw_le())
    }

    /// Write `count` zero bytes at `offset`.
    pub fn write_padding(&mut self, offset: usize, count: usize) -> Result<usize, WriteError> {
        const ZEROS: [u8; 16] = [0; 16];
        let mut written = 0;
        while written < count {
            let n = (count - written).min(ZEROS.len());
            written += self.write_bytes(offset + written, &ZEROS[..n])?;
        }
        Ok(written)
    }

    /// Copy all of `src` into this view at `offset`.
    pub fn copy_from(&mut self, offset: usize, src: &ReadableData) -> Result<usize, WriteError> {
        let pos = self.check_write(offset, src.len)?;
        src.store
            .copy_to(src.start, src.len, &mut self.store.borrow_mut(), pos)
    }

    /// Read back a previously written scalar.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        if self.bound_len.is_some_and(|bound| end > bound) {
            return Err(ReadError::OutOfBounds);
        }
        let store = self.store.borrow();
        store
            .as_slice()
            .get(self.start + offset..self.start + end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Convert this view into a readable view of the same bytes.
    ///
    /// If this is the last handle to the store, no copy is made.
    pub fn into_readable(self) -> ReadableData {
        let WritableData {
            store,
            start,
            bound_len,
        } = self;
        let store = Rc::try_unwrap(store)
            .map(RefCell::into_inner)
            .unwrap_or_else(|shared| shared.borrow().clone());
        let full = ReadableData::from_store(store);
        let end = bound_len
            .map(|len| start.saturating_add(len))
            .unwrap_or(full.len())
            .min(full.len());
        full.slice(start.min(end)..end).unwrap_or_default()
    }
}

impl std::fmt::Debug for WritableData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritableData")
            .field("start", &self.start)
            .field("bound_len", &self.bound_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfnt_types::{Fixed, Tag, Uint24};

    #[test]
    fn fixed_view_bounds() {
        let mut data = WritableData::new_fixed(4);
        assert_eq!(data.write_at(0, 0xaabbu16), Ok(2));
        assert_eq!(data.write_at(2, 7u32), Err(WriteError::OutOfBounds));
        assert_eq!(data.write_at(2, 7u16), Ok(2));
        assert_eq!(data.into_readable().as_bytes(), &[0xaa, 0xbb, 0, 7]);
    }

    #[test]
    fn slices_share_the_store() {
        let mut data = WritableData::new_growable(1);
        let mut tail = data.split_off(4).unwrap();
        assert!(tail.is_open());
        tail.write_at(0, Tag::new(b"cmap")).unwrap();
        data.write_at(0, Uint24::new(0x010203)).unwrap();
        assert_eq!(data.read_at::<Tag>(4), Ok(Tag::new(b"cmap")));
        drop(tail);
        assert_eq!(
            data.into_readable().as_bytes(),
            &[1, 2, 3, 0, b'c', b'm', b'a', b'p']
        );
    }

    #[test]
    fn bounded_slice_of_open_view() {
        let data = WritableData::new_growable(8);
        let mut window = data.slice(2..4).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window.write_at(0, 1u32), Err(WriteError::OutOfBounds));
        assert!(window.slice(0..3).is_none());
        window.write_padding(0, 2).unwrap();
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn little_endian_and_padding() {
        let mut data = WritableData::new_growable(4);
        data.write_u32_le(0, 0x0102_0304).unwrap();
        data.write_padding(4, 40).unwrap();
        data.write_at(44, Fixed::ONE).unwrap();
        let read = data.into_readable();
        assert_eq!(read.len(), 48);
        assert_eq!(read.read_u32_le(0), Ok(0x0102_0304));
        assert_eq!(read.read_at::<u32>(0), Ok(0x0403_0201));
        assert_eq!(read.read_at::<Fixed>(44), Ok(Fixed::ONE));
    }

    #[test]
    fn copy_between_views() {
        let src = ReadableData::new(&[1, 2, 3, 4, 5]);
        let mut dest = WritableData::new_fixed(8);
        let mut tail = dest.split_off(2).unwrap();
        assert_eq!(src.slice(1..).unwrap().copy_to(&mut tail), Ok(4));
        assert_eq!(tail.copy_from(3, &src), Err(WriteError::OutOfBounds));
        drop(tail);
        dest.bound(0, 6).unwrap();
        assert_eq!(dest.into_readable().as_bytes(), &[0, 0, 2, 3, 4, 5]);
    }
}
