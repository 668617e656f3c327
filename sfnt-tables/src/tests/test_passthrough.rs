//! untouched builders reproduce their input exactly

use pretty_assertions::assert_eq;
use rstest::rstest;
use sfnt_data::{ReadableData, WritableData};
use sfnt_test_data::{cff, coverage, layout};

use crate::{
    cff::{CffDict, CffIndexBuilder},
    coverage::CoverageBuilder,
    feature::{FeatureList, FeatureListBuilder},
    mark_glyph_sets::MarkGlyphSetsBuilder,
    TableBuilder,
};

/// Size and serialize a builder, checking that a fixed size was honoured.
pub(crate) fn rewrite<B: TableBuilder>(builder: &mut B) -> Vec<u8> {
    let size = builder.size_to_serialize();
    let mut out = WritableData::new_growable(size.len.max(1));
    let written = builder.serialize(&mut out).unwrap();
    if size.fixed {
        assert_eq!(written, size.len, "size pass and serialize pass disagree");
    }
    out.into_readable()
        .slice(..written)
        .unwrap()
        .as_bytes()
        .to_vec()
}

fn passthrough<B: TableBuilder>(bytes: &[u8]) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut builder = B::from_data(bytes.into());
    assert_eq!(rewrite(&mut builder), bytes);
    // and the result parses
    assert!(builder.build().is_ok());
}

#[rstest]
#[case::format1(coverage::FORMAT1_ODD_GLYPHS)]
#[case::format2(coverage::FORMAT2_SPLIT_RANGE)]
#[case::unsorted(coverage::FORMAT1_UNSORTED)]
fn coverage_passthrough(#[case] bytes: &[u8]) {
    passthrough::<CoverageBuilder>(bytes);
}

#[rstest]
#[case::canonical(layout::FEATURE_LIST)]
#[case::malformed(layout::FEATURE_LIST_MALFORMED)]
#[case::with_empties(layout::FEATURE_LIST_WITH_EMPTIES)]
fn feature_list_passthrough(#[case] bytes: &[u8]) {
    passthrough::<FeatureListBuilder>(bytes);
}

#[rstest]
#[case::canonical(layout::MARK_GLYPH_SETS)]
#[case::shared(layout::MARK_GLYPH_SETS_SHARED)]
fn mark_glyph_sets_passthrough(#[case] bytes: &[u8]) {
    passthrough::<MarkGlyphSetsBuilder>(bytes);
}

#[rstest]
#[case::empty(cff::EMPTY_INDEX)]
#[case::strings(cff::STRING_INDEX)]
#[case::dicts(cff::TOP_DICT_INDEX)]
fn cff_index_passthrough(#[case] bytes: &[u8]) {
    passthrough::<CffIndexBuilder<Vec<u8>>>(bytes);
    passthrough::<CffIndexBuilder<CffDict>>(bytes);
}

#[test]
fn canonical_feature_list_survives_expansion() {
    let mut builder = FeatureListBuilder::from_data(layout::FEATURE_LIST.into());
    builder.prepare_to_edit().unwrap();
    assert!(builder.is_expanded());
    assert_eq!(rewrite(&mut builder), layout::FEATURE_LIST);
}

#[test]
fn canonical_mark_glyph_sets_survive_expansion() {
    let mut builder = MarkGlyphSetsBuilder::from_data(layout::MARK_GLYPH_SETS.into());
    builder.prepare_to_edit().unwrap();
    assert_eq!(rewrite(&mut builder), layout::MARK_GLYPH_SETS);
}

#[test]
fn unmodified_dicts_are_copied() {
    let mut builder = CffIndexBuilder::<CffDict>::from_data(cff::TOP_DICT_INDEX.into());
    // expands the index, but leaves the dict untouched
    assert_eq!(builder.elements_mut().unwrap().len(), 1);
    assert!(builder.is_expanded());
    assert_eq!(rewrite(&mut builder), cff::TOP_DICT_INDEX);
}

#[test]
fn checksum_of_rebuilt_table() {
    let source = ReadableData::new(layout::FEATURE_LIST_MALFORMED);
    let mut builder = FeatureListBuilder::from_data(source.clone());
    let built: FeatureList = builder.build().unwrap();
    assert_eq!(built.data().checksum(), source.checksum());

    builder.prepare_to_edit().unwrap();
    let rebuilt = builder.build().unwrap();
    assert_eq!(
        rebuilt.data().checksum(),
        ReadableData::new(layout::FEATURE_LIST).checksum()
    );
}
