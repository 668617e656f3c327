//! The [coverage table](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table)

use sfnt_data::{types::GlyphId16, ReadError, ReadableData, WritableData, WriteError};

use crate::range_set::RangeSet;
use crate::table::{SerializedSize, TableBuilder};

const HEADER_LEN: usize = 4;
const GLYPH_LEN: usize = 2;
const RANGE_RECORD_LEN: usize = 6;

/// A coverage table, mapping a set of glyphs to dense coverage indices.
///
/// An empty byte range reads as an empty format 1 table.
#[derive(Clone, Debug)]
pub enum CoverageTable {
    Format1(CoverageFormat1),
    Format2(CoverageFormat2),
}

/// A sorted array of glyph ids.
#[derive(Clone, Debug)]
pub struct CoverageFormat1 {
    data: ReadableData,
    glyph_count: usize,
}

/// A sorted array of `(start, end, start_coverage_index)` range records.
#[derive(Clone, Debug)]
pub struct CoverageFormat2 {
    data: ReadableData,
    range_count: usize,
}

impl CoverageTable {
    pub fn read(data: ReadableData) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Ok(CoverageTable::Format1(CoverageFormat1 {
                data,
                glyph_count: 0,
            }));
        }
        let format = data.read_at::<u16>(0)?;
        let count = data.read_at::<u16>(2)? as usize;
        match format {
            1 if data.len() >= HEADER_LEN + count * GLYPH_LEN => {
                Ok(CoverageTable::Format1(CoverageFormat1 {
                    data,
                    glyph_count: count,
                }))
            }
            2 if data.len() >= HEADER_LEN + count * RANGE_RECORD_LEN => {
                Ok(CoverageTable::Format2(CoverageFormat2 {
                    data,
                    range_count: count,
                }))
            }
            1 | 2 => Err(ReadError::InvalidArrayLen),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }

    /// The encoded length of the coverage table at the start of `data`.
    pub fn measure(data: &ReadableData) -> Result<usize, ReadError> {
        if data.is_empty() {
            return Ok(0);
        }
        let count = data.read_at::<u16>(2)? as usize;
        match data.read_at::<u16>(0)? {
            1 => Ok(HEADER_LEN + count * GLYPH_LEN),
            2 => Ok(HEADER_LEN + count * RANGE_RECORD_LEN),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }

    pub fn format(&self) -> u16 {
        match self {
            CoverageTable::Format1(_) => 1,
            CoverageTable::Format2(_) => 2,
        }
    }

    /// `true` if `glyph` is covered.
    pub fn covers(&self, glyph: GlyphId16) -> bool {
        self.coverage_index(glyph).is_some()
    }

    /// The coverage index of `glyph`, if it is covered.
    pub fn coverage_index(&self, glyph: GlyphId16) -> Option<u16> {
        match self {
            CoverageTable::Format1(table) => table.coverage_index(glyph),
            CoverageTable::Format2(table) => table.coverage_index(glyph),
        }
    }

    /// The number of covered glyphs.
    pub fn len(&self) -> usize {
        match self {
            CoverageTable::Format1(table) => table.glyph_count,
            CoverageTable::Format2(table) => table
                .ranges()
                // an inverted range covers nothing
                .map(|(start, end, _)| end.checked_sub(start).map_or(0, |d| d as usize + 1))
                .sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the covered glyphs in coverage index order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        let (format1, format2) = match self {
            CoverageTable::Format1(table) => (Some(table.iter()), None),
            CoverageTable::Format2(table) => (None, Some(table.iter())),
        };
        format1
            .into_iter()
            .flatten()
            .chain(format2.into_iter().flatten())
    }
}

impl CoverageFormat1 {
    fn glyph_at(&self, index: usize) -> Option<u16> {
        self.data.read_at(HEADER_LEN + index * GLYPH_LEN).ok()
    }

    fn coverage_index(&self, glyph: GlyphId16) -> Option<u16> {
        self.data
            .search_u16(HEADER_LEN, GLYPH_LEN, self.glyph_count, glyph.to_u16())
            .ok()
            .flatten()
            .map(|index| index as u16)
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        (0..self.glyph_count)
            .filter_map(|i| self.glyph_at(i))
            .map(GlyphId16::new)
    }
}

impl CoverageFormat2 {
    fn range_at(&self, index: usize) -> Option<(u16, u16, u16)> {
        let pos = HEADER_LEN + index * RANGE_RECORD_LEN;
        Some((
            self.data.read_at(pos).ok()?,
            self.data.read_at(pos + 2).ok()?,
            self.data.read_at(pos + 4).ok()?,
        ))
    }

    fn ranges(&self) -> impl Iterator<Item = (u16, u16, u16)> + '_ {
        (0..self.range_count).filter_map(|i| self.range_at(i))
    }

    fn coverage_index(&self, glyph: GlyphId16) -> Option<u16> {
        let gid = glyph.to_u16();
        let index = self
            .data
            .search_u16_range(
                HEADER_LEN,
                RANGE_RECORD_LEN,
                HEADER_LEN + 2,
                RANGE_RECORD_LEN,
                self.range_count,
                gid,
            )
            .ok()
            .flatten()?;
        let (start, _, start_index) = self.range_at(index)?;
        start_index.checked_add(gid - start)
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        self.ranges()
            .flat_map(|(start, end, _)| start..=end)
            .map(GlyphId16::new)
    }
}

/// A builder for a [`CoverageTable`].
///
/// The builder keeps its glyphs as a set of ranges. When it is written the
/// smaller encoding is chosen; format 1 is used only when it is strictly
/// smaller, so equal sizes produce format 2.
#[derive(Clone, Debug, Default)]
pub struct CoverageBuilder {
    source: ReadableData,
    glyphs: Option<RangeSet>,
}

impl CoverageBuilder {
    /// A builder for a new, empty coverage table.
    pub fn new() -> Self {
        CoverageBuilder {
            source: ReadableData::default(),
            glyphs: Some(RangeSet::default()),
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.glyphs.is_some()
    }

    fn glyphs_mut(&mut self) -> Result<&mut RangeSet, ReadError> {
        if self.glyphs.is_none() {
            let table = CoverageTable::read(self.source.clone())?;
            self.glyphs = Some(table.iter().map(|gid| gid.to_u16()).collect());
        }
        Ok(self.glyphs.get_or_insert_with(RangeSet::default))
    }

    pub fn add(&mut self, glyph: GlyphId16) -> Result<(), ReadError> {
        self.add_range(glyph, glyph)
    }

    /// Add the inclusive range `start..=end`.
    pub fn add_range(&mut self, start: GlyphId16, end: GlyphId16) -> Result<(), ReadError> {
        self.glyphs_mut()?.insert(start.to_u16()..=end.to_u16());
        Ok(())
    }

    pub fn remove(&mut self, glyph: GlyphId16) -> Result<(), ReadError> {
        self.remove_range(glyph, glyph)
    }

    /// Remove the inclusive range `start..=end`, splitting ranges as needed.
    pub fn remove_range(&mut self, start: GlyphId16, end: GlyphId16) -> Result<(), ReadError> {
        self.glyphs_mut()?.remove(start.to_u16()..=end.to_u16());
        Ok(())
    }

    /// Remove all glyphs.
    pub fn clear(&mut self) {
        self.glyphs.get_or_insert_with(RangeSet::default).clear();
    }

    pub fn contains(&self, glyph: GlyphId16) -> Result<bool, ReadError> {
        match &self.glyphs {
            Some(glyphs) => Ok(glyphs.contains(glyph.to_u16())),
            None => Ok(CoverageTable::read(self.source.clone())?.covers(glyph)),
        }
    }

    /// The covered glyphs, in ascending order.
    pub fn glyphs(&self) -> Result<Vec<GlyphId16>, ReadError> {
        match &self.glyphs {
            Some(glyphs) => Ok(glyphs.iter().map(GlyphId16::new).collect()),
            None => Ok(CoverageTable::read(self.source.clone())?.iter().collect()),
        }
    }

    /// Discard edits, returning to the source data.
    pub fn revert(&mut self) {
        self.glyphs = None;
    }
}

/// The format that encodes `glyphs` most compactly.
fn choose_format(glyphs: &RangeSet) -> u16 {
    // format 1 costs two bytes per glyph, format 2 six bytes per range
    if glyphs.len() < glyphs.num_ranges() * 3 {
        1
    } else {
        2
    }
}

impl FromIterator<GlyphId16> for CoverageBuilder {
    fn from_iter<T: IntoIterator<Item = GlyphId16>>(iter: T) -> Self {
        CoverageBuilder {
            source: ReadableData::default(),
            glyphs: Some(iter.into_iter().map(|gid| gid.to_u16()).collect()),
        }
    }
}

impl TableBuilder for CoverageBuilder {
    type Table = CoverageTable;

    fn from_data(data: ReadableData) -> Self {
        CoverageBuilder {
            source: data,
            glyphs: None,
        }
    }

    fn measure(data: &ReadableData) -> Result<usize, ReadError> {
        CoverageTable::measure(data)
    }

    fn size_to_serialize(&mut self) -> SerializedSize {
        let Some(glyphs) = &self.glyphs else {
            return SerializedSize::exact(self.source.len());
        };
        if glyphs.is_empty() {
            return SerializedSize::ZERO;
        }
        let len = match choose_format(glyphs) {
            1 => HEADER_LEN + glyphs.len() * GLYPH_LEN,
            _ => HEADER_LEN + glyphs.num_ranges() * RANGE_RECORD_LEN,
        };
        SerializedSize::exact(len)
    }

    fn serialize(&mut self, data: &mut WritableData) -> Result<usize, WriteError> {
        let Some(glyphs) = &self.glyphs else {
            return self.source.copy_to(data);
        };
        if glyphs.is_empty() {
            return Ok(0);
        }
        let format = choose_format(glyphs);
        log::trace!(
            "coverage of {} glyphs in {} ranges as format {format}",
            glyphs.len(),
            glyphs.num_ranges()
        );
        let count = match format {
            1 => glyphs.len(),
            _ => glyphs.num_ranges(),
        };
        let mut pos = data.write_at(0, format)?;
        pos += data.write_at(
            pos,
            u16::try_from(count).map_err(|_| WriteError::CountOverflow(count))?,
        )?;
        if format == 1 {
            for gid in glyphs.iter() {
                pos += data.write_at(pos, gid)?;
            }
        } else {
            let mut coverage_index = 0usize;
            for range in glyphs.iter_ranges() {
                let start_index = u16::try_from(coverage_index)
                    .map_err(|_| WriteError::CountOverflow(coverage_index))?;
                pos += data.write_at(pos, *range.start())?;
                pos += data.write_at(pos, *range.end())?;
                pos += data.write_at(pos, start_index)?;
                coverage_index += range.len();
            }
        }
        Ok(pos)
    }

    fn read_table(data: ReadableData) -> Result<CoverageTable, ReadError> {
        CoverageTable::read(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfnt_test_data::coverage as test_data;

    fn gids<const N: usize>(raw: [u16; N]) -> Vec<GlyphId16> {
        raw.into_iter().map(GlyphId16::new).collect()
    }

    #[test]
    fn read_format1() {
        let table = CoverageTable::read(test_data::FORMAT1_ODD_GLYPHS.into()).unwrap();
        assert_eq!(table.format(), 1);
        assert_eq!(table.len(), 3);
        assert_eq!(table.coverage_index(GlyphId16::new(5)), Some(2));
        assert!(!table.covers(GlyphId16::new(4)));
        assert_eq!(table.iter().collect::<Vec<_>>(), gids([1, 3, 5]));
    }

    #[test]
    fn read_format2() {
        let table = CoverageTable::read(test_data::FORMAT2_SPLIT_RANGE.into()).unwrap();
        assert_eq!(table.format(), 2);
        assert_eq!(table.len(), 7);
        assert_eq!(table.coverage_index(GlyphId16::new(4)), Some(2));
        assert_eq!(table.coverage_index(GlyphId16::new(8)), Some(6));
        assert_eq!(table.coverage_index(GlyphId16::new(3)), None);
        assert_eq!(table.iter().collect::<Vec<_>>(), gids([1, 2, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn bad_data() {
        assert_eq!(
            CoverageTable::read(test_data::BAD_FORMAT.into()).err(),
            Some(ReadError::InvalidFormat(3))
        );
        let truncated = &test_data::FORMAT1_ODD_GLYPHS[..8];
        assert_eq!(
            CoverageTable::read(truncated.into()).err(),
            Some(ReadError::InvalidArrayLen)
        );
        let empty = CoverageTable::read(ReadableData::default()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn inverted_range() {
        // format 2, one range from 9 down to 3
        let data = ReadableData::new(&[0, 2, 0, 1, 0, 9, 0, 3, 0, 0]);
        let table = CoverageTable::read(data).unwrap();
        assert!(!table.covers(GlyphId16::new(5)));
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn format_choice() {
        // 3 glyphs in 3 ranges: 10 bytes vs 22
        let set = [1u16, 3, 5].into_iter().collect::<RangeSet>();
        assert_eq!(choose_format(&set), 1);
        // 3 glyphs in one range: 10 bytes either way
        let set = [1u16, 2, 3].into_iter().collect::<RangeSet>();
        assert_eq!(choose_format(&set), 2);
        // 2 glyphs in one range: 8 bytes vs 10
        let set = [1u16, 2].into_iter().collect::<RangeSet>();
        assert_eq!(choose_format(&set), 1);
    }

    #[test]
    fn edit_expands_from_source() {
        let mut builder = CoverageBuilder::from_data(test_data::FORMAT1_ODD_GLYPHS.into());
        assert!(!builder.is_expanded());
        assert_eq!(builder.contains(GlyphId16::new(3)), Ok(true));
        builder.add(GlyphId16::new(2)).unwrap();
        assert!(builder.is_expanded());
        assert_eq!(builder.glyphs().unwrap(), gids([1, 2, 3, 5]));
        builder.revert();
        assert_eq!(builder.glyphs().unwrap(), gids([1, 3, 5]));
    }

    #[test]
    fn empty_builder_sizes_to_zero() {
        let mut builder = CoverageBuilder::new();
        assert_eq!(builder.size_to_serialize(), SerializedSize::ZERO);
        let built = builder.build().unwrap();
        assert!(built.is_empty());
    }
}
