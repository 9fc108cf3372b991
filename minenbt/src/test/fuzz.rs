//! Inputs that once tripped up the decoder.
use crate::{de::Decoder, from_bytes, from_reader, Source};

#[test]
fn partial_input() {
    let input = [10, 0, 0, 9, 0, 0, 10, 0, 0, 0, 2];
    assert!(from_bytes(&input).is_err());
    assert!(from_reader(&input[..]).is_err());
}

#[test]
fn list_of_end_with_length() {
    let input = [10, 0, 0, 9, 0, 0, 0, 127, 255, 255, 255, 0];
    assert!(from_bytes(&input).is_err());
}

#[test]
fn huge_name_length() {
    let input = [10, 255, 255, 0];
    assert!(from_bytes(&input).unwrap_err().is_truncated());
}

#[test]
fn nested_list_of_huge_int_arrays() {
    let input = [
        10, 0, 0, 9, 0, 0, 11, 0x7f, 0xff, 0xff, 0xff, 0x7f, 0xff, 0xff, 0xff,
    ];
    assert!(from_bytes(&input).is_err());
    assert!(from_reader(&input[..]).is_err());
}

#[test]
fn long_array_length_overflow() {
    let input = [12, 0, 0, 0x7f, 0xff, 0xff, 0xff];
    let mut decoder = Decoder::new(Source::buffer(&input));
    assert!(decoder.read_tag().is_err());
}
