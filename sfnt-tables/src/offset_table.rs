//! Tables made of a list of offsets to homogeneous subtables.
//!
//! An offset table is an optional fixed-length header, a [`RecordList`] of
//! `(key, offset)` records, and the subtables those records address. Offsets
//! are relative to the start of the table (that is, to the start of the
//! header).
//!
//! The builder has two states. An *unexpanded* builder trusts its source
//! bytes and writes them back verbatim, whatever they contain. The first
//! operation that needs to look at individual entries *expands* it: each
//! record becomes a child builder wrapping the bytes at its offset, and from
//! then on the table is written from scratch. Expansion normalizes the
//! structure:
//!
//! - entries of sorted tables are put in key order, keeping the first entry
//!   when a key is repeated;
//! - subtables that were shared by several records are written once per
//!   record;
//! - bytes not addressed by any record are dropped;
//! - children that size to zero (including those behind null offsets) are
//!   dropped, along with their records.

use std::marker::PhantomData;

use sfnt_data::{
    types::Offset, OffsetRecord, ReadError, ReadableData, Record, RecordKey, RecordList,
    WritableData, WriteError,
};

use crate::table::{SerializedSize, TableBuilder};

/// Describes the shape of one kind of offset table.
pub trait OffsetLayout {
    /// How entries are identified.
    type Key: RecordKey;
    /// The width of the offsets in the records.
    type Offset: Offset;
    /// The builder for the subtables.
    type Child: TableBuilder;

    /// The length of the header that precedes the record list.
    const HEADER_LEN: usize = 0;

    /// The header written for new tables.
    fn default_header() -> Vec<u8> {
        vec![0; Self::HEADER_LEN]
    }
}

type RecordOf<L> = OffsetRecord<<L as OffsetLayout>::Key, <L as OffsetLayout>::Offset>;
type ChildTable<L> = <<L as OffsetLayout>::Child as TableBuilder>::Table;

/// Bound the subtable at `offset` to its measured length.
fn sub_table_data<L: OffsetLayout>(
    data: &ReadableData,
    offset: L::Offset,
) -> Result<Option<ReadableData>, ReadError> {
    let Some(offset) = offset.non_null() else {
        return Ok(None);
    };
    let sub = data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
    let len = L::Child::measure(&sub)?;
    sub.slice(..len).map(Some).ok_or(ReadError::OutOfBounds)
}

/// A parsed offset table.
///
/// An empty byte range is an absent table, which has no entries.
pub struct OffsetTable<L: OffsetLayout> {
    data: ReadableData,
    records: Option<RecordList<RecordOf<L>>>,
    layout: PhantomData<L>,
}

impl<L: OffsetLayout> OffsetTable<L> {
    pub fn read(data: ReadableData) -> Result<Self, ReadError> {
        let records = if data.is_empty() {
            None
        } else {
            let list_data = data.split_off(L::HEADER_LEN).ok_or(ReadError::OutOfBounds)?;
            Some(RecordList::read(&list_data)?)
        };
        Ok(OffsetTable {
            data,
            records,
            layout: PhantomData,
        })
    }

    /// `true` if the table was read from an empty byte range.
    pub fn is_absent(&self) -> bool {
        self.records.is_none()
    }

    /// The raw bytes of the table.
    pub fn data(&self) -> &ReadableData {
        &self.data
    }

    /// The header bytes preceding the record list.
    pub fn header(&self) -> &[u8] {
        self.data
            .as_bytes()
            .get(..L::HEADER_LEN)
            .unwrap_or_default()
    }

    /// The number of records.
    pub fn count(&self) -> usize {
        self.records.as_ref().map(RecordList::count).unwrap_or(0)
    }

    fn record(&self, index: usize) -> Result<RecordOf<L>, ReadError> {
        self.records
            .as_ref()
            .ok_or(ReadError::OutOfBounds)?
            .get(index)
    }

    pub fn key_at(&self, index: usize) -> Result<L::Key, ReadError> {
        self.record(index).map(|record| record.key)
    }

    pub fn offset_at(&self, index: usize) -> Result<L::Offset, ReadError> {
        self.record(index).map(|record| record.offset)
    }

    /// The bytes of the subtable at `index`, or `None` for a null offset.
    pub fn sub_table_data(&self, index: usize) -> Result<Option<ReadableData>, ReadError> {
        sub_table_data::<L>(&self.data, self.offset_at(index)?)
    }

    /// The subtable at `index`, or `None` for a null offset.
    pub fn sub_table_at(&self, index: usize) -> Result<Option<ChildTable<L>>, ReadError> {
        self.sub_table_data(index)?
            .map(L::Child::read_table)
            .transpose()
    }

    /// The subtable of the first record with this key.
    pub fn sub_table_for_key(&self, key: L::Key) -> Result<Option<ChildTable<L>>, ReadError> {
        let Some(records) = &self.records else {
            return Ok(None);
        };
        match records.record_for_key(key)? {
            Some(record) => sub_table_data::<L>(&self.data, record.offset)?
                .map(L::Child::read_table)
                .transpose(),
            None => Ok(None),
        }
    }

    /// Iterate over `(key, subtable)` pairs in record order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = Result<(L::Key, Option<ChildTable<L>>), ReadError>> + '_ {
        (0..self.count()).map(move |i| -> Result<_, ReadError> {
            Ok((self.key_at(i)?, self.sub_table_at(i)?))
        })
    }
}

impl<L: OffsetLayout> std::fmt::Debug for OffsetTable<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetTable")
            .field("len", &self.data.len())
            .field("count", &self.count())
            .finish()
    }
}

enum BuilderState<L: OffsetLayout> {
    Unexpanded,
    Expanded {
        header: Vec<u8>,
        entries: Vec<(L::Key, L::Child)>,
    },
}

/// The outcome of a size pass over an expanded builder.
struct SizePlan {
    /// Indices of the entries that will be written.
    survivors: Vec<usize>,
}

/// A builder for an [`OffsetTable`].
pub struct OffsetTableBuilder<L: OffsetLayout> {
    source: ReadableData,
    state: BuilderState<L>,
    plan: Option<SizePlan>,
}

impl<L: OffsetLayout> OffsetTableBuilder<L> {
    /// A builder for a new, empty table.
    pub fn new() -> Self {
        OffsetTableBuilder {
            source: ReadableData::default(),
            state: BuilderState::Expanded {
                header: L::default_header(),
                entries: Vec::new(),
            },
            plan: None,
        }
    }

    /// `true` if the builder has been expanded into child builders.
    pub fn is_expanded(&self) -> bool {
        matches!(self.state, BuilderState::Expanded { .. })
    }

    /// The number of entries.
    ///
    /// For an unexpanded builder this is the count stored in the source,
    /// including any entries that expansion would drop.
    pub fn sub_table_count(&self) -> Result<usize, ReadError> {
        match &self.state {
            BuilderState::Unexpanded if self.source.is_empty() => Ok(0),
            BuilderState::Unexpanded => self
                .source
                .read_at::<u16>(L::HEADER_LEN)
                .map(|count| count as usize),
            BuilderState::Expanded { entries, .. } => Ok(entries.len()),
        }
    }

    /// The keys of all entries, in the order they would currently be written.
    ///
    /// This does not expand the builder.
    pub fn keys(&self) -> Result<Vec<L::Key>, ReadError> {
        match &self.state {
            BuilderState::Unexpanded if self.source.is_empty() => Ok(Vec::new()),
            BuilderState::Unexpanded => {
                let list_data = self
                    .source
                    .split_off(L::HEADER_LEN)
                    .ok_or(ReadError::OutOfBounds)?;
                RecordList::<RecordOf<L>>::read(&list_data)?
                    .iter()
                    .map(|record| record.map(|r| r.key))
                    .collect()
            }
            BuilderState::Expanded { entries, .. } => {
                Ok(entries.iter().map(|(key, _)| *key).collect())
            }
        }
    }

    /// Expand the builder so that its entries can be edited.
    ///
    /// Children are created unexpanded. Calling this on an expanded builder
    /// does nothing.
    pub fn prepare_to_edit(&mut self) -> Result<(), ReadError> {
        self.plan = None;
        if self.is_expanded() {
            return Ok(());
        }
        let (header, entries) = self.expand()?;
        self.state = BuilderState::Expanded { header, entries };
        Ok(())
    }

    fn expand(&self) -> Result<(Vec<u8>, Vec<(L::Key, L::Child)>), ReadError> {
        if self.source.is_empty() {
            return Ok((L::default_header(), Vec::new()));
        }
        let header = self
            .source
            .as_bytes()
            .get(..L::HEADER_LEN)
            .ok_or(ReadError::OutOfBounds)?
            .to_vec();
        let list_data = self
            .source
            .split_off(L::HEADER_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let records = RecordList::<RecordOf<L>>::read(&list_data)?;
        let mut entries = Vec::with_capacity(records.count());
        for record in records.iter() {
            let record = record?;
            let child_data = match sub_table_data::<L>(&self.source, record.offset)? {
                Some(data) => data,
                None => {
                    log::debug!("null offset for {:?}", record.key);
                    ReadableData::default()
                }
            };
            entries.push((record.key, L::Child::from_data(child_data)));
        }

        if <L::Key as RecordKey>::SORTED {
            if !entries.windows(2).all(|pair| pair[0].0 <= pair[1].0) {
                log::debug!("sorting out-of-order records");
                entries.sort_by_key(|(key, _)| *key);
            }
            let before = entries.len();
            entries.dedup_by(|later, earlier| later.0 == earlier.0);
            if entries.len() != before {
                log::debug!("dropped {} records with duplicate keys", before - entries.len());
            }
        }
        Ok((header, entries))
    }

    fn entries_mut(&mut self) -> Result<&mut Vec<(L::Key, L::Child)>, ReadError> {
        self.prepare_to_edit()?;
        match &mut self.state {
            BuilderState::Expanded { entries, .. } => Ok(entries),
            BuilderState::Unexpanded => unreachable!("builder was just expanded"),
        }
    }

    /// The builder for the entry at `index`.
    pub fn builder_at(&mut self, index: usize) -> Result<&mut L::Child, ReadError> {
        self.entries_mut()?
            .get_mut(index)
            .map(|(_, child)| child)
            .ok_or(ReadError::OutOfBounds)
    }

    /// The builder for the entry with this key, if there is one.
    pub fn builder_for_key(&mut self, key: L::Key) -> Result<Option<&mut L::Child>, ReadError> {
        Ok(self
            .entries_mut()?
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, child)| child))
    }

    /// Add an entry.
    ///
    /// In a sorted table the entry is placed in key order and replaces any
    /// entry with the same key, which is returned. In a positional table it
    /// is appended.
    pub fn add_builder(
        &mut self,
        key: L::Key,
        builder: L::Child,
    ) -> Result<Option<L::Child>, ReadError> {
        let entries = self.entries_mut()?;
        if !<L::Key as RecordKey>::SORTED {
            entries.push((key, builder));
            return Ok(None);
        }
        match entries.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(pos) => Ok(Some(std::mem::replace(&mut entries[pos].1, builder))),
            Err(pos) => {
                entries.insert(pos, (key, builder));
                Ok(None)
            }
        }
    }

    /// Remove the entry at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<(L::Key, L::Child), ReadError> {
        let entries = self.entries_mut()?;
        if index >= entries.len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(entries.remove(index))
    }

    /// Remove the entry with this key, if there is one.
    pub fn remove_key(&mut self, key: L::Key) -> Result<Option<L::Child>, ReadError> {
        let entries = self.entries_mut()?;
        Ok(entries
            .iter()
            .position(|(k, _)| *k == key)
            .map(|pos| entries.remove(pos).1))
    }

    /// Discard all edits, returning to the source data.
    pub fn revert(&mut self) {
        self.state = BuilderState::Unexpanded;
        self.plan = None;
    }
}

impl<L: OffsetLayout> Default for OffsetTableBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: OffsetLayout> TableBuilder for OffsetTableBuilder<L> {
    type Table = OffsetTable<L>;

    fn from_data(data: ReadableData) -> Self {
        OffsetTableBuilder {
            source: data,
            state: BuilderState::Unexpanded,
            plan: None,
        }
    }

    fn measure(data: &ReadableData) -> Result<usize, ReadError> {
        if data.is_empty() {
            return Ok(0);
        }
        let list_data = data.split_off(L::HEADER_LEN).ok_or(ReadError::OutOfBounds)?;
        let records = RecordList::<RecordOf<L>>::read(&list_data)?;
        let mut end = L::HEADER_LEN + records.limit();
        for record in records.iter() {
            let offset = record?.offset;
            if let Some(sub) = sub_table_data::<L>(data, offset)? {
                end = end.max(offset.to_u32() as usize + sub.len());
            }
        }
        Ok(end)
    }

    fn size_to_serialize(&mut self) -> SerializedSize {
        let entries = match &mut self.state {
            BuilderState::Unexpanded => return SerializedSize::exact(self.source.len()),
            BuilderState::Expanded { entries, .. } => entries,
        };
        let mut survivors = Vec::with_capacity(entries.len());
        let mut children = SerializedSize::ZERO;
        for (i, (key, child)) in entries.iter_mut().enumerate() {
            let size = child.size_to_serialize();
            if size.is_zero() {
                log::debug!("dropping empty subtable for {key:?}");
                continue;
            }
            survivors.push(i);
            children = children + size;
        }
        let size = if survivors.is_empty() {
            SerializedSize::ZERO
        } else {
            SerializedSize::exact(
                L::HEADER_LEN + RecordList::<RecordOf<L>>::size_of_list(survivors.len()),
            ) + children
        };
        self.plan = Some(SizePlan { survivors });
        size
    }

    fn ready_to_serialize(&self) -> bool {
        match &self.state {
            BuilderState::Unexpanded => true,
            BuilderState::Expanded { entries, .. } => {
                entries.iter().all(|(_, child)| child.ready_to_serialize())
            }
        }
    }

    fn serialize(&mut self, data: &mut WritableData) -> Result<usize, WriteError> {
        let (header, entries) = match &mut self.state {
            BuilderState::Unexpanded => return self.source.copy_to(data),
            BuilderState::Expanded { header, entries } => (header, entries),
        };
        let plan = self.plan.as_ref().ok_or(WriteError::NotSized)?;
        if plan.survivors.is_empty() {
            return Ok(0);
        }

        data.write_bytes(0, header.as_slice())?;
        let count = plan.survivors.len();
        data.write_at(
            L::HEADER_LEN,
            u16::try_from(count).map_err(|_| WriteError::CountOverflow(count))?,
        )?;
        let mut record_pos = L::HEADER_LEN + 2;
        let mut sub_table_pos =
            L::HEADER_LEN + RecordList::<RecordOf<L>>::size_of_list(count);
        for &i in &plan.survivors {
            let (key, child) = &mut entries[i];
            let offset = u32::try_from(sub_table_pos)
                .ok()
                .and_then(L::Offset::try_from_u32)
                .ok_or(WriteError::OffsetOverflow {
                    offset: sub_table_pos,
                    width: L::Offset::WIDTH,
                })?;
            record_pos += OffsetRecord::new(*key, offset).write(data, record_pos)?;
            let mut target = data
                .split_off(sub_table_pos)
                .ok_or(WriteError::OutOfBounds)?;
            sub_table_pos += child.serialize(&mut target)?;
        }
        Ok(sub_table_pos)
    }

    fn read_table(data: ReadableData) -> Result<OffsetTable<L>, ReadError> {
        OffsetTable::read(data)
    }
}

impl<L: OffsetLayout> std::fmt::Debug for OffsetTableBuilder<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetTableBuilder")
            .field("source_len", &self.source.len())
            .field("expanded", &self.is_expanded())
            .finish()
    }
}
