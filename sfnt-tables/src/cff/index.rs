//! CFF INDEX data.
//!
//! See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=12>

use sfnt_data::{ReadError, ReadableData, WritableData, WriteError};

use crate::table::{SerializedSize, TableBuilder};

const COUNT_LEN: usize = 2;
const OFF_SIZE_LEN: usize = 1;
const MIN_OFF_SIZE: u8 = 1;
const MAX_OFF_SIZE: u8 = 4;

/// Read a big-endian offset of `off_size` bytes.
fn read_offset(data: &ReadableData, pos: usize, off_size: u8) -> Result<usize, ReadError> {
    let mut value = 0usize;
    for i in 0..off_size as usize {
        value = (value << 8) | data.read_at::<u8>(pos + i)? as usize;
    }
    Ok(value)
}

fn write_offset(
    data: &mut WritableData,
    pos: usize,
    off_size: u8,
    value: usize,
) -> Result<usize, WriteError> {
    let bytes = (value as u32).to_be_bytes();
    data.write_bytes(pos, &bytes[4 - off_size as usize..])
}

/// The smallest offset size that can encode `max_offset`.
fn min_off_size(max_offset: usize) -> u8 {
    match max_offset {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}

fn max_offset_for(off_size: u8) -> usize {
    (1usize << (8 * off_size as usize)) - 1
}

/// A parsed INDEX: a count, an offset size, `count + 1` offsets and the
/// element data they delimit.
#[derive(Clone, Debug)]
pub struct CffIndex {
    data: ReadableData,
    count: usize,
    off_size: u8,
}

impl CffIndex {
    pub fn read(data: ReadableData) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(0)? as usize;
        if count == 0 {
            return Ok(CffIndex {
                data,
                count,
                off_size: 0,
            });
        }
        let off_size = data.read_at::<u8>(COUNT_LEN)?;
        if !(MIN_OFF_SIZE..=MAX_OFF_SIZE).contains(&off_size) {
            return Err(ReadError::InvalidFormat(off_size as i64));
        }
        let index = CffIndex {
            data,
            count,
            off_size,
        };
        if index.offset_at(0)? != 1 {
            return Err(ReadError::MalformedData("first INDEX offset must be 1"));
        }
        Ok(index)
    }

    /// The encoded length of the INDEX at the start of `data`.
    pub fn measure(data: &ReadableData) -> Result<usize, ReadError> {
        let index = CffIndex::read(data.clone())?;
        if index.count == 0 {
            return Ok(COUNT_LEN);
        }
        Ok(index.data_start() + index.offset_at(index.count)? - 1)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// The width of the offsets, or `0` for an empty INDEX.
    pub fn off_size(&self) -> u8 {
        self.off_size
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn data_start(&self) -> usize {
        COUNT_LEN + OFF_SIZE_LEN + (self.count + 1) * self.off_size as usize
    }

    /// The 1-based offset at `index`, where `index` is in `0..=count`.
    pub fn offset_at(&self, index: usize) -> Result<usize, ReadError> {
        if index > self.count {
            return Err(ReadError::OutOfBounds);
        }
        let pos = COUNT_LEN + OFF_SIZE_LEN + index * self.off_size as usize;
        read_offset(&self.data, pos, self.off_size)
    }

    /// The data of the element at `index`.
    pub fn get(&self, index: usize) -> Result<ReadableData, ReadError> {
        if index >= self.count {
            return Err(ReadError::OutOfBounds);
        }
        let start = self.offset_at(index)?;
        let end = self.offset_at(index + 1)?;
        if start == 0 || end < start {
            return Err(ReadError::MalformedData("INDEX offsets must be increasing"));
        }
        let base = self.data_start() - 1;
        self.data
            .slice(base + start..base + end)
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<ReadableData, ReadError>> + '_ {
        (0..self.count).map(move |i| self.get(i))
    }
}

/// Something that can be stored in a [`CffIndexBuilder`].
pub trait IndexElement: Sized {
    fn from_data(data: ReadableData) -> Result<Self, ReadError>;

    /// The number of bytes the element will write.
    fn size(&self) -> SerializedSize;

    fn ready_to_serialize(&self) -> bool {
        true
    }

    fn serialize(&self, data: &mut WritableData) -> Result<usize, WriteError>;
}

impl IndexElement for ReadableData {
    fn from_data(data: ReadableData) -> Result<Self, ReadError> {
        Ok(data)
    }

    fn size(&self) -> SerializedSize {
        SerializedSize::exact(self.len())
    }

    fn serialize(&self, data: &mut WritableData) -> Result<usize, WriteError> {
        self.copy_to(data)
    }
}

impl IndexElement for Vec<u8> {
    fn from_data(data: ReadableData) -> Result<Self, ReadError> {
        Ok(data.as_bytes().to_vec())
    }

    fn size(&self) -> SerializedSize {
        SerializedSize::exact(self.len())
    }

    fn serialize(&self, data: &mut WritableData) -> Result<usize, WriteError> {
        data.write_bytes(0, self)
    }
}

/// A builder for a [`CffIndex`].
///
/// The offset size is the smallest that fits the element data, unless one
/// is set explicitly with [`set_off_size`](CffIndexBuilder::set_off_size).
#[derive(Clone, Debug)]
pub struct CffIndexBuilder<E> {
    source: ReadableData,
    elements: Option<Vec<E>>,
    off_size: Option<u8>,
}

impl<E: IndexElement> CffIndexBuilder<E> {
    /// A builder for a new INDEX holding `elements`.
    pub fn new(elements: Vec<E>) -> Self {
        CffIndexBuilder {
            source: ReadableData::default(),
            elements: Some(elements),
            off_size: None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.elements.is_some()
    }

    /// The number of elements.
    pub fn count(&self) -> Result<usize, ReadError> {
        match &self.elements {
            Some(elements) => Ok(elements.len()),
            None if self.source.is_empty() => Ok(0),
            None => Ok(self.source.read_at::<u16>(0)? as usize),
        }
    }

    /// The elements, decoded for editing.
    pub fn elements_mut(&mut self) -> Result<&mut Vec<E>, ReadError> {
        if self.elements.is_none() {
            let elements = if self.source.is_empty() {
                Vec::new()
            } else {
                CffIndex::read(self.source.clone())?
                    .iter()
                    .map(|data| data.and_then(E::from_data))
                    .collect::<Result<Vec<_>, _>>()?
            };
            self.elements = Some(elements);
        }
        Ok(self.elements.get_or_insert_with(Vec::new))
    }

    /// Force the width of the offsets.
    ///
    /// # Panics
    ///
    /// Panics if `off_size` is not in `1..=4`.
    pub fn set_off_size(&mut self, off_size: u8) -> Result<(), ReadError> {
        assert!(
            (MIN_OFF_SIZE..=MAX_OFF_SIZE).contains(&off_size),
            "offSize must be in 1..=4, got {off_size}"
        );
        self.elements_mut()?;
        self.off_size = Some(off_size);
        Ok(())
    }

    /// The explicitly set offset size, if any.
    pub fn off_size(&self) -> Option<u8> {
        self.off_size
    }

    /// Discard edits, returning to the source data.
    pub fn revert(&mut self) {
        self.elements = None;
        self.off_size = None;
    }

    fn element_data_size(elements: &[E]) -> SerializedSize {
        elements.iter().map(IndexElement::size).sum()
    }

    fn off_size_for(&self, data_len: usize) -> u8 {
        self.off_size.unwrap_or_else(|| min_off_size(data_len + 1))
    }
}

impl<E: IndexElement> Default for CffIndexBuilder<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<E: IndexElement> TableBuilder for CffIndexBuilder<E> {
    type Table = CffIndex;

    fn from_data(data: ReadableData) -> Self {
        CffIndexBuilder {
            source: data,
            elements: None,
            off_size: None,
        }
    }

    fn measure(data: &ReadableData) -> Result<usize, ReadError> {
        CffIndex::measure(data)
    }

    fn size_to_serialize(&mut self) -> SerializedSize {
        let Some(elements) = &self.elements else {
            return SerializedSize::exact(self.source.len());
        };
        if elements.is_empty() {
            return SerializedSize::exact(COUNT_LEN);
        }
        let data_size = Self::element_data_size(elements);
        let off_size = self.off_size_for(data_size.len);
        let header =
            COUNT_LEN + OFF_SIZE_LEN + (elements.len() + 1) * off_size as usize;
        SerializedSize::exact(header) + data_size
    }

    fn ready_to_serialize(&self) -> bool {
        let Some(elements) = &self.elements else {
            return true;
        };
        if !elements.iter().all(IndexElement::ready_to_serialize) {
            return false;
        }
        match self.off_size {
            Some(off_size) => {
                Self::element_data_size(elements).len < max_offset_for(off_size)
            }
            None => true,
        }
    }

    fn serialize(&mut self, data: &mut WritableData) -> Result<usize, WriteError> {
        let Some(elements) = &self.elements else {
            return self.source.copy_to(data);
        };
        let count = u16::try_from(elements.len())
            .map_err(|_| WriteError::CountOverflow(elements.len()))?;
        data.write_at(0, count)?;
        if count == 0 {
            return Ok(COUNT_LEN);
        }
        let off_size = self.off_size_for(Self::element_data_size(elements).len);
        data.write_at(COUNT_LEN, off_size)?;
        let offsets_pos = COUNT_LEN + OFF_SIZE_LEN;
        let data_start = offsets_pos + (elements.len() + 1) * off_size as usize;

        // elements first, since a provisional size is only a guess
        let mut ends = Vec::with_capacity(elements.len());
        let mut pos = data_start;
        for element in elements {
            let mut target = data.split_off(pos).ok_or(WriteError::OutOfBounds)?;
            pos += element.serialize(&mut target)?;
            ends.push(pos - data_start + 1);
        }
        let max_offset = max_offset_for(off_size);
        let mut offset_pos = offsets_pos;
        for offset in std::iter::once(1).chain(ends) {
            if offset > max_offset {
                return Err(WriteError::OffsetOverflow {
                    offset,
                    width: off_size as usize,
                });
            }
            offset_pos += write_offset(data, offset_pos, off_size, offset)?;
        }
        Ok(pos)
    }

    fn read_table(data: ReadableData) -> Result<CffIndex, ReadError> {
        CffIndex::read(data)
    }
}
