//! Fixed-length records and count-prefixed lists of them

use std::fmt::Debug;

use sfnt_types::{Offset, Tag};

use crate::error::{ReadError, WriteError};
use crate::readable::ReadableData;
use crate::writable::WritableData;

/// A fixed-length tuple of scalar fields.
pub trait Record: Sized + Clone {
    /// The encoded length of the record, in bytes.
    const RECORD_LEN: usize;

    /// Read a record at `offset`.
    fn read(data: &ReadableData, offset: usize) -> Result<Self, ReadError>;

    /// Write this record at `offset`, returning the number of bytes written.
    fn write(&self, data: &mut WritableData, offset: usize) -> Result<usize, WriteError>;
}

/// The kind of key that identifies the entries of an offset table.
///
/// `()` is used for tables whose entries are identified by position alone;
/// `u16` and [`Tag`] keys are kept in ascending order.
pub trait RecordKey: Copy + Ord + Debug {
    /// The encoded length of the key, in bytes.
    const ENCODED_LEN: usize;
    /// `true` if records with this key are stored sorted by key.
    const SORTED: bool;

    fn read_key(data: &ReadableData, offset: usize) -> Result<Self, ReadError>;
    fn write_key(self, data: &mut WritableData, offset: usize) -> Result<usize, WriteError>;
}

impl RecordKey for () {
    const ENCODED_LEN: usize = 0;
    const SORTED: bool = false;

    fn read_key(_: &ReadableData, _: usize) -> Result<Self, ReadError> {
        Ok(())
    }

    fn write_key(self, _: &mut WritableData, _: usize) -> Result<usize, WriteError> {
        Ok(0)
    }
}

impl RecordKey for u16 {
    const ENCODED_LEN: usize = 2;
    const SORTED: bool = true;

    fn read_key(data: &ReadableData, offset: usize) -> Result<Self, ReadError> {
        data.read_at(offset)
    }

    fn write_key(self, data: &mut WritableData, offset: usize) -> Result<usize, WriteError> {
        data.write_at(offset, self)
    }
}

impl RecordKey for Tag {
    const ENCODED_LEN: usize = 4;
    const SORTED: bool = true;

    fn read_key(data: &ReadableData, offset: usize) -> Result<Self, ReadError> {
        data.read_at(offset)
    }

    fn write_key(self, data: &mut WritableData, offset: usize) -> Result<usize, WriteError> {
        data.write_at(offset, self)
    }
}

/// A record that is identified by a key.
pub trait KeyedRecord: Record {
    type Key: RecordKey;

    fn key(&self) -> Self::Key;
}

/// A `(key, offset)` pair, the record type of offset tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetRecord<K, O> {
    pub key: K,
    pub offset: O,
}

impl<K, O> OffsetRecord<K, O> {
    pub fn new(key: K, offset: O) -> Self {
        OffsetRecord { key, offset }
    }
}

impl<K: RecordKey, O: Offset> Record for OffsetRecord<K, O> {
    const RECORD_LEN: usize = K::ENCODED_LEN + O::WIDTH;

    fn read(data: &ReadableData, offset: usize) -> Result<Self, ReadError> {
        Ok(OffsetRecord {
            key: K::read_key(data, offset)?,
            offset: data.read_at(offset + K::ENCODED_LEN)?,
        })
    }

    fn write(&self, data: &mut WritableData, offset: usize) -> Result<usize, WriteError> {
        let key_len = self.key.write_key(data, offset)?;
        Ok(key_len + data.write_at(offset + key_len, self.offset)?)
    }
}

impl<K: RecordKey, O: Offset> KeyedRecord for OffsetRecord<K, O> {
    type Key = K;

    fn key(&self) -> K {
        self.key
    }
}

impl Record for u16 {
    const RECORD_LEN: usize = 2;

    fn read(data: &ReadableData, offset: usize) -> Result<Self, ReadError> {
        data.read_at(offset)
    }

    fn write(&self, data: &mut WritableData, offset: usize) -> Result<usize, WriteError> {
        data.write_at(offset, *self)
    }
}

impl KeyedRecord for u16 {
    type Key = u16;

    fn key(&self) -> u16 {
        *self
    }
}

const COUNT_LEN: usize = 2;

/// A `u16` count followed by that many records.
///
/// A list read from data decodes records on demand. The first edit copies the
/// records into memory, after which the in-memory list is authoritative and
/// the source data is no longer consulted.
#[derive(Clone, Debug)]
pub struct RecordList<R> {
    state: ListState<R>,
}

#[derive(Clone, Debug)]
enum ListState<R> {
    Data { data: ReadableData, count: usize },
    Owned(Vec<R>),
}

impl<R: Record> RecordList<R> {
    /// An empty, editable list.
    pub fn new() -> Self {
        RecordList {
            state: ListState::Owned(Vec::new()),
        }
    }

    /// Read a list from the start of `data`.
    ///
    /// Fails if the data is too short to hold the count and all the records
    /// it declares.
    pub fn read(data: &ReadableData) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(0)? as usize;
        let data = data
            .slice(..Self::size_of_list(count))
            .ok_or(ReadError::InvalidArrayLen)?;
        Ok(RecordList {
            state: ListState::Data { data, count },
        })
    }

    /// The encoded length of a list with `count` records.
    pub const fn size_of_list(count: usize) -> usize {
        COUNT_LEN + count * R::RECORD_LEN
    }

    pub fn count(&self) -> usize {
        match &self.state {
            ListState::Data { count, .. } => *count,
            ListState::Owned(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The offset of the first byte after the list.
    pub fn limit(&self) -> usize {
        Self::size_of_list(self.count())
    }

    /// The record at `index`.
    pub fn get(&self, index: usize) -> Result<R, ReadError> {
        match &self.state {
            ListState::Data { data, count } if index < *count => {
                R::read(data, COUNT_LEN + index * R::RECORD_LEN)
            }
            ListState::Data { .. } => Err(ReadError::OutOfBounds),
            ListState::Owned(records) => records.get(index).cloned().ok_or(ReadError::OutOfBounds),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<R, ReadError>> + '_ {
        (0..self.count()).map(move |i| self.get(i))
    }

    /// The records, decoded into memory for editing.
    pub fn records_mut(&mut self) -> Result<&mut Vec<R>, ReadError> {
        if matches!(self.state, ListState::Data { .. }) {
            let records = self.iter().collect::<Result<Vec<_>, _>>()?;
            self.state = ListState::Owned(records);
        }
        match &mut self.state {
            ListState::Owned(records) => Ok(records),
            ListState::Data { .. } => unreachable!("list was just decoded"),
        }
    }

    /// Add a record to the end of the list.
    pub fn append(&mut self, record: R) -> Result<(), ReadError> {
        self.records_mut()?.push(record);
        Ok(())
    }

    /// Serialize the count and all records at `offset`.
    ///
    /// An unedited list is copied verbatim from its source.
    pub fn write_to(&self, data: &mut WritableData, offset: usize) -> Result<usize, WriteError> {
        match &self.state {
            ListState::Data { data: src, .. } => {
                let mut target = data.split_off(offset).ok_or(WriteError::OutOfBounds)?;
                src.copy_to(&mut target)
            }
            ListState::Owned(records) => {
                let count = u16::try_from(records.len())
                    .map_err(|_| WriteError::CountOverflow(records.len()))?;
                let mut pos = offset + data.write_at(offset, count)?;
                for record in records {
                    pos += record.write(data, pos)?;
                }
                Ok(pos - offset)
            }
        }
    }
}

impl<R: KeyedRecord> RecordList<R> {
    /// Add a record, keeping sorted lists in key order.
    ///
    /// In a sorted list a new record goes after any existing records with an
    /// equal key.
    pub fn add(&mut self, record: R) -> Result<(), ReadError> {
        let records = self.records_mut()?;
        if R::Key::SORTED {
            let key = record.key();
            let pos = records.partition_point(|r| r.key() <= key);
            records.insert(pos, record);
        } else {
            records.push(record);
        }
        Ok(())
    }

    /// The first record with this key, if any.
    pub fn record_for_key(&self, key: R::Key) -> Result<Option<R>, ReadError> {
        if R::Key::SORTED {
            let (mut lo, mut hi) = (0, self.count());
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if self.get(mid)?.key() < key {
                    lo = mid + 1;
                } else {
                    hi = mid;
                }
            }
            if lo < self.count() {
                let record = self.get(lo)?;
                if record.key() == key {
                    return Ok(Some(record));
                }
            }
        }
        // unsorted lists, and source data that ignores the required order
        for record in self.iter() {
            let record = record?;
            if record.key() == key {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

impl<R: Record> Default for RecordList<R> {
    fn default() -> Self {
        Self::new()
    }
}
