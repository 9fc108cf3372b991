#![no_main]
use libfuzzer_sys::fuzz_target;

use minenbt::{from_bytes, from_reader, to_bytes};

fuzz_target!(|data: &[u8]| {
    let from_buffer = from_bytes(data);
    let from_stream = from_reader(data);

    // both sources must agree on what is valid.
    match (from_buffer, from_stream) {
        (Ok(a), Ok(b)) => assert_eq!(to_bytes(&a).unwrap(), to_bytes(&b).unwrap()),
        (Err(a), Err(b)) => assert_eq!(a.kind(), b.kind()),
        (a, b) => panic!("buffer gave {:?}, stream gave {:?}", a, b),
    }
});
