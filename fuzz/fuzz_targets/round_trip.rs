#![no_main]
use libfuzzer_sys::fuzz_target;

use minenbt::{de::Decoder, ser::Encoder, DecodeOpts, Source, Tag};

fuzz_target!(|tag: Tag| {
    let mut encoder = Encoder::new(vec![]);
    if encoder.write_tag(&tag).is_err() {
        // names or strings too long for NBT.
        return;
    }
    let bs = encoder.into_inner();

    let opts = DecodeOpts::new().max_depth(usize::MAX);
    let decoded = Decoder::with_opts(Source::buffer(&bs), opts)
        .read_tag()
        .unwrap();

    let mut encoder = Encoder::new(vec![]);
    encoder.write_tag(&decoded).unwrap();
    assert_eq!(bs, encoder.into_inner());
});
