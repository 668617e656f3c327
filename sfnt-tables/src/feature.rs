//! The [feature list](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-list-table)
//! and [feature](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-table) tables

use sfnt_data::{
    types::{Offset, Offset16, Tag},
    ReadError, ReadableData, RecordList, WritableData, WriteError,
};

use crate::offset_table::{OffsetLayout, OffsetTable, OffsetTableBuilder};
use crate::table::{SerializedSize, TableBuilder};

const PARAMS_LEN: usize = 2;

/// The shape of a feature list: tag-keyed records with 16-bit offsets to
/// [`Feature`] tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureListLayout;

impl OffsetLayout for FeatureListLayout {
    type Key = Tag;
    type Offset = Offset16;
    type Child = FeatureBuilder;
}

pub type FeatureList = OffsetTable<FeatureListLayout>;
pub type FeatureListBuilder = OffsetTableBuilder<FeatureListLayout>;

/// A feature table: an (unsupported) params offset and a list of lookup
/// indices.
#[derive(Clone, Debug)]
pub struct Feature {
    data: ReadableData,
    lookup_indices: RecordList<u16>,
}

impl Feature {
    pub fn read(data: ReadableData) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Ok(Feature {
                data,
                lookup_indices: RecordList::new(),
            });
        }
        let list_data = data.split_off(PARAMS_LEN).ok_or(ReadError::OutOfBounds)?;
        let lookup_indices = RecordList::read(&list_data)?;
        Ok(Feature {
            data,
            lookup_indices,
        })
    }

    /// The offset to the feature params table.
    pub fn feature_params_offset(&self) -> Offset16 {
        self.data.read_at(0).unwrap_or_default()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookup_indices.count()
    }

    pub fn lookup_index(&self, index: usize) -> Result<u16, ReadError> {
        self.lookup_indices.get(index)
    }

    pub fn lookup_indices(&self) -> impl Iterator<Item = Result<u16, ReadError>> + '_ {
        self.lookup_indices.iter()
    }
}

/// A builder for a [`Feature`].
///
/// Feature params are not supported: a source feature that has them is
/// rewritten with a null params offset. This happens even when nothing was
/// edited, so unlike the other builders an unexpanded `FeatureBuilder` does
/// not always reproduce its source byte for byte.
#[derive(Clone, Debug, Default)]
pub struct FeatureBuilder {
    source: ReadableData,
    lookup_indices: Option<RecordList<u16>>,
}

impl FeatureBuilder {
    /// A new feature with the given lookups.
    pub fn new(lookup_indices: impl IntoIterator<Item = u16>) -> Self {
        let mut list = RecordList::new();
        for index in lookup_indices {
            // an owned list never fails to append
            let _ = list.append(index);
        }
        FeatureBuilder {
            source: ReadableData::default(),
            lookup_indices: Some(list),
        }
    }

    fn source_params(&self) -> Offset16 {
        self.source.read_at(0).unwrap_or_default()
    }

    fn source_list(&self) -> Result<RecordList<u16>, ReadError> {
        if self.source.is_empty() {
            return Ok(RecordList::new());
        }
        let list_data = self
            .source
            .split_off(PARAMS_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        RecordList::read(&list_data)
    }

    fn list_mut(&mut self) -> Result<&mut RecordList<u16>, ReadError> {
        if self.lookup_indices.is_none() {
            self.lookup_indices = Some(self.source_list()?);
        }
        Ok(self.lookup_indices.get_or_insert_with(RecordList::new))
    }

    /// Stop trusting the source once it carries params we can't write.
    fn drop_feature_params(&mut self) {
        if self.lookup_indices.is_some() || self.source_params().is_null() {
            return;
        }
        log::warn!(
            "dropping unsupported feature params at {}",
            self.source_params().to_u32()
        );
        if let Err(e) = self.list_mut() {
            log::warn!("feature lookups could not be read: {e}");
        }
    }

    pub fn lookup_indices(&self) -> Result<Vec<u16>, ReadError> {
        match &self.lookup_indices {
            Some(list) => list.iter().collect(),
            None => self.source_list()?.iter().collect(),
        }
    }

    /// Add a lookup index to the end of the list.
    pub fn push_lookup(&mut self, lookup_index: u16) -> Result<(), ReadError> {
        self.list_mut()?.append(lookup_index)
    }

    /// Remove every occurrence of a lookup index.
    pub fn remove_lookup(&mut self, lookup_index: u16) -> Result<(), ReadError> {
        self.list_mut()?
            .records_mut()?
            .retain(|index| *index != lookup_index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lookup_indices = Some(RecordList::new());
    }
}

impl TableBuilder for FeatureBuilder {
    type Table = Feature;

    fn from_data(data: ReadableData) -> Self {
        FeatureBuilder {
            source: data,
            lookup_indices: None,
        }
    }

    fn measure(data: &ReadableData) -> Result<usize, ReadError> {
        if data.is_empty() {
            return Ok(0);
        }
        let count = data.read_at::<u16>(PARAMS_LEN)? as usize;
        Ok(PARAMS_LEN + RecordList::<u16>::size_of_list(count))
    }

    fn size_to_serialize(&mut self) -> SerializedSize {
        self.drop_feature_params();
        let count = match &self.lookup_indices {
            Some(list) => list.count(),
            None => match self.source_list() {
                Ok(list) => list.count(),
                Err(_) => return SerializedSize::exact(self.source.len()),
            },
        };
        if count == 0 {
            return SerializedSize::ZERO;
        }
        match &self.lookup_indices {
            Some(_) => SerializedSize::exact(PARAMS_LEN + RecordList::<u16>::size_of_list(count)),
            None => SerializedSize::exact(self.source.len()),
        }
    }

    fn serialize(&mut self, data: &mut WritableData) -> Result<usize, WriteError> {
        self.drop_feature_params();
        let Some(list) = &self.lookup_indices else {
            return self.source.copy_to(data);
        };
        if list.is_empty() {
            return Ok(0);
        }
        data.write_at(0, Offset16::null())?;
        Ok(PARAMS_LEN + list.write_to(data, PARAMS_LEN)?)
    }

    fn read_table(data: ReadableData) -> Result<Feature, ReadError> {
        Feature::read(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::{bebuffer::BeBuffer, layout as test_data};

    #[test]
    fn read_feature_list() {
        let list = FeatureList::read(test_data::FEATURE_LIST.into()).unwrap();
        assert_eq!(list.count(), 2);
        assert_eq!(list.key_at(1).unwrap(), Tag::new(b"liga"));
        let liga = list.sub_table_for_key(Tag::new(b"liga")).unwrap().unwrap();
        assert_eq!(
            liga.lookup_indices().collect::<Result<Vec<_>, _>>().unwrap(),
            [1, 2]
        );
        assert!(liga.feature_params_offset().is_null());
        assert!(list.sub_table_for_key(Tag::new(b"mark")).unwrap().is_none());
    }

    #[test]
    fn params_are_dropped() {
        let _ = env_logger::builder().is_test(true).try_init();
        // params offset, one lookup, then the params table
        let buf = BeBuffer::new().extend([6u16, 1, 4]).push(0xdead_u16);
        let mut builder = FeatureBuilder::from_data(buf.to_vec().into());
        assert_eq!(builder.size_to_serialize(), SerializedSize::exact(6));
        let feature = builder.build().unwrap();
        assert!(feature.feature_params_offset().is_null());
        assert_eq!(feature.lookup_index(0), Ok(4));
    }

    #[test]
    fn edits() {
        let mut builder = FeatureBuilder::new([3, 1, 3]);
        builder.remove_lookup(3).unwrap();
        builder.push_lookup(9).unwrap();
        assert_eq!(builder.lookup_indices().unwrap(), [1, 9]);
        let feature = builder.build().unwrap();
        assert_eq!(feature.lookup_count(), 2);

        builder.clear();
        assert!(builder.size_to_serialize().is_zero());
    }
}
