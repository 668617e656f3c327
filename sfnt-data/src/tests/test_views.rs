//! scenarios spanning stores, readable views and writable views

use pretty_assertions::assert_eq;
use rstest::rstest;
use sfnt_test_data::bebuffer::BeBuffer;
use sfnt_types::{Fixed, LongDateTime, Tag, Uint24};

use crate::{ByteStore, ReadError, ReadableData, WritableData};

#[rstest]
#[case::zeros(&[0; 8], 0)]
#[case::two_words(&[0, 0, 0, 1, 0, 0, 0, 2], 3)]
#[case::trailing_partial(&[0, 0, 0, 1, 0x80], 0x8000_0001)]
#[case::empty(&[], 0)]
fn checksum(#[case] bytes: &[u8], #[case] expected: u32) {
    assert_eq!(ReadableData::new(bytes).checksum(), expected);
}

#[test]
fn typed_fields() {
    let buf = BeBuffer::new()
        .push(0xfeu8)
        .push(-2i8)
        .push(0x1234u16)
        .push(-300i16)
        .push(Uint24::new(0x00ab_cdef))
        .push(0xdead_beefu32)
        .push(i32::MIN)
        .push(Fixed::from_f64(1.5))
        .push(LongDateTime::new(3_600))
        .push(Tag::new(b"GSUB"));
    let data = ReadableData::new(&buf);
    assert_eq!(data.read_at::<u8>(0), Ok(0xfe));
    assert_eq!(data.read_at::<i8>(1), Ok(-2));
    assert_eq!(data.read_at::<u16>(2), Ok(0x1234));
    assert_eq!(data.read_at::<i16>(4), Ok(-300));
    assert_eq!(data.read_at::<Uint24>(6), Ok(Uint24::new(0x00ab_cdef)));
    assert_eq!(data.read_at::<u32>(9), Ok(0xdead_beef));
    assert_eq!(data.read_at::<i32>(13), Ok(i32::MIN));
    assert_eq!(data.read_at::<Fixed>(17), Ok(Fixed::from_f64(1.5)));
    assert_eq!(data.read_at::<LongDateTime>(21), Ok(LongDateTime::new(3_600)));
    assert_eq!(data.read_at::<Tag>(29), Ok(Tag::new(b"GSUB")));
    assert_eq!(data.read_at::<Tag>(30), Err(ReadError::OutOfBounds));
}

#[test]
fn write_then_read_back() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut out = WritableData::new_growable(4);
    let mut pos = 0;
    pos += out.write_at(pos, Tag::new(b"head")).unwrap();
    pos += out.write_at(pos, Fixed::ONE).unwrap();
    pos += out.write_u32_le(pos, 0x11223344).unwrap();
    pos += out.write_padding(pos, 3).unwrap();
    pos += out.write_bytes(pos, &[0xaa]).unwrap();
    assert_eq!(pos, 16);

    let data = out.into_readable();
    assert_eq!(data.len(), 16);
    assert_eq!(
        data.as_bytes(),
        BeBuffer::new()
            .push(Tag::new(b"head"))
            .push(Fixed::ONE)
            .bytes(&[0x44, 0x33, 0x22, 0x11, 0, 0, 0, 0xaa])
            .as_slice()
    );
}

#[test]
fn views_survive_store_growth() {
    let mut data = WritableData::new_growable(2);
    let mut tail = data.split_off(100).unwrap();
    data.write_at(0, 1u16).unwrap();
    tail.write_at(0, 2u16).unwrap();
    // the first view still reads through the grown store
    assert_eq!(data.read_at::<u16>(0), Ok(1));
    assert_eq!(data.read_at::<u16>(100), Ok(2));
    assert_eq!(data.len(), 102);
}

#[test]
fn copy_stream_round_trip() {
    let src = ReadableData::new(&(0..=255).collect::<Vec<u8>>());
    let mut sink = Vec::new();
    let slice = src.slice(16..48).unwrap();
    assert_eq!(slice.copy_to_writer(&mut sink).unwrap(), 32);

    let mut store = ByteStore::growable(8);
    store
        .copy_from_reader(0, &mut sink.as_slice(), None)
        .unwrap();
    assert_eq!(ReadableData::from_store(store), slice);
}
