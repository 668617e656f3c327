//! coverage building, membership and format selection

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rstest::rstest;
use sfnt_test_data::coverage as test_data;

use crate::{
    coverage::{CoverageBuilder, CoverageTable},
    test_passthrough::rewrite,
    types::GlyphId16,
    SerializedSize, TableBuilder,
};

fn gid(raw: u16) -> GlyphId16 {
    GlyphId16::new(raw)
}

fn build(glyphs: impl IntoIterator<Item = u16>) -> CoverageTable {
    let mut builder: CoverageBuilder = glyphs.into_iter().map(gid).collect();
    builder.build().unwrap()
}

/// The coverage index of every glyph up to `max`, with `-1` for uncovered.
fn probe(table: &CoverageTable, max: u16) -> Vec<i32> {
    (0..=max)
        .map(|raw| {
            table
                .coverage_index(gid(raw))
                .map(i32::from)
                .unwrap_or(-1)
        })
        .collect()
}

#[test]
fn odd_glyphs_use_format1() {
    let table = build([1, 3, 5]);
    assert_eq!(table.format(), 1);
    assert_eq!(probe(&table, 5), [-1, 0, -1, 1, -1, 2]);
}

#[test]
fn contiguous_glyphs_use_format2() {
    let table = build([1, 2, 3]);
    assert_eq!(table.format(), 2);
    assert_eq!(table.len(), 3);
    assert_eq!(probe(&table, 4), [-1, 0, 1, 2, -1]);
}

#[test]
fn removal_splits_a_range() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut builder = CoverageBuilder::new();
    builder.add_range(gid(1), gid(8)).unwrap();
    builder.remove(gid(3)).unwrap();
    let table = builder.build().unwrap();
    assert_eq!(table.format(), 2);
    assert_eq!(
        probe(&table, 9),
        [-1, 0, 1, -1, 2, 3, 4, 5, 6, -1]
    );
    assert_eq!(rewrite(&mut builder), test_data::FORMAT2_SPLIT_RANGE);
}

#[rstest]
#[case::single(&[7], 1)]
#[case::pair(&[7, 8], 1)]
#[case::tie(&[7, 8, 9], 2)]
#[case::long_run(&[1, 2, 3, 4, 5, 6], 2)]
#[case::mixed(&[1, 2, 3, 10, 20], 1)]
#[case::two_runs(&[1, 2, 3, 4, 10, 11, 12], 2)]
fn format_choice(#[case] glyphs: &[u16], #[case] format: u16) {
    let mut builder: CoverageBuilder = glyphs.iter().copied().map(gid).collect();
    let size = builder.size_to_serialize();
    let table = builder.build().unwrap();
    assert_eq!(table.format(), format);
    let expected_len = match format {
        1 => 4 + 2 * glyphs.len(),
        _ => 4 + 6 * table_ranges(glyphs),
    };
    assert_eq!(size, SerializedSize::exact(expected_len));
}

fn table_ranges(glyphs: &[u16]) -> usize {
    1 + glyphs.windows(2).filter(|pair| pair[1] != pair[0] + 1).count()
}

#[test]
fn random_membership() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..50 {
        let len = rng.gen_range(0..200);
        let spread = rng.gen_range(1..2_000u16);
        let glyphs = (0..len)
            .map(|_| rng.gen_range(0..spread))
            .collect::<BTreeSet<_>>();
        let table = build(glyphs.iter().copied());
        let max = glyphs.last().copied().unwrap_or(0);
        for raw in 0..=max + 2 {
            let expected = glyphs.range(..raw).count();
            let index = table.coverage_index(gid(raw));
            if glyphs.contains(&raw) {
                assert_eq!(index, Some(expected as u16), "round {round}, glyph {raw}");
            } else {
                assert_eq!(index, None, "round {round}, glyph {raw}");
            }
        }
        assert_eq!(table.len(), glyphs.len());
        assert!(table.iter().map(|g| g.to_u16()).eq(glyphs.iter().copied()));
    }
}

#[test]
fn edited_unsorted_source_is_sorted() {
    let mut builder = CoverageBuilder::from_data(test_data::FORMAT1_UNSORTED.into());
    // read as it is
    let table = CoverageTable::read(test_data::FORMAT1_UNSORTED.into()).unwrap();
    assert_eq!(
        table.iter().map(|g| g.to_u16()).collect::<Vec<_>>(),
        [9, 2, 5]
    );
    builder.add(gid(4)).unwrap();
    assert_eq!(
        rewrite(&mut builder),
        [0, 1, 0, 4, 0, 2, 0, 4, 0, 5, 0, 9]
    );
}

#[test]
fn clear_and_remove_range() {
    let mut builder = CoverageBuilder::from_data(test_data::FORMAT2_SPLIT_RANGE.into());
    builder.remove_range(gid(2), gid(5)).unwrap();
    assert_eq!(
        builder.glyphs().unwrap(),
        [1, 6, 7, 8].map(gid)
    );
    assert_eq!(builder.contains(gid(7)), Ok(true));
    builder.clear();
    assert!(builder.glyphs().unwrap().is_empty());
    assert!(builder.size_to_serialize().is_zero());
}
