//! The GDEF [mark glyph sets](https://learn.microsoft.com/en-us/typography/opentype/spec/gdef#mark-glyph-sets-table) table

use sfnt_data::{
    types::{GlyphId16, Offset32},
    ReadError,
};

use crate::coverage::CoverageBuilder;
use crate::offset_table::{OffsetLayout, OffsetTable, OffsetTableBuilder};

/// The shape of a mark glyph sets table: a format field, then positional
/// 32-bit offsets to coverage tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkGlyphSetsLayout;

impl OffsetLayout for MarkGlyphSetsLayout {
    type Key = ();
    type Offset = Offset32;
    type Child = CoverageBuilder;

    const HEADER_LEN: usize = 2;

    fn default_header() -> Vec<u8> {
        1u16.to_be_bytes().to_vec()
    }
}

pub type MarkGlyphSets = OffsetTable<MarkGlyphSetsLayout>;
pub type MarkGlyphSetsBuilder = OffsetTableBuilder<MarkGlyphSetsLayout>;

impl OffsetTable<MarkGlyphSetsLayout> {
    pub fn format(&self) -> Result<u16, ReadError> {
        self.data().read_at(0)
    }

    /// `true` if the set at `set_index` contains `glyph`.
    pub fn covers(&self, set_index: usize, glyph: GlyphId16) -> Result<bool, ReadError> {
        Ok(self
            .sub_table_at(set_index)?
            .is_some_and(|coverage| coverage.covers(glyph)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableBuilder;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::layout as test_data;

    #[test]
    fn read() {
        let sets = MarkGlyphSets::read(test_data::MARK_GLYPH_SETS.into()).unwrap();
        assert_eq!(sets.format(), Ok(1));
        assert_eq!(sets.count(), 2);
        assert!(sets.covers(0, GlyphId16::new(3)).unwrap());
        assert!(!sets.covers(0, GlyphId16::new(2)).unwrap());
        assert!(sets.covers(1, GlyphId16::new(15)).unwrap());
        assert!(sets.covers(2, GlyphId16::new(15)).is_err());
    }

    #[test]
    fn new_sets() {
        let mut builder = MarkGlyphSetsBuilder::new();
        builder
            .add_builder((), [4, 5].map(GlyphId16::new).into_iter().collect())
            .unwrap();
        builder
            .add_builder((), [9].map(GlyphId16::new).into_iter().collect())
            .unwrap();
        let sets = builder.build().unwrap();
        assert_eq!(sets.format(), Ok(1));
        assert_eq!(
            sets.data().as_bytes(),
            [
                0, 1, 0, 2, 0, 0, 0, 12, 0, 0, 0, 20, // header
                0, 1, 0, 2, 0, 4, 0, 5, // {4, 5}
                0, 1, 0, 1, 0, 9, // {9}
            ]
        );
    }
}
