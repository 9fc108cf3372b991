#![no_main]
use libfuzzer_sys::fuzz_target;

use mineanvil::Region;
use std::io::Cursor;

fuzz_target!(|data: Vec<u8>| {
    if let Ok(mut r) = Region::from_stream(Cursor::new(data)) {
        for (x, z) in [(0, 0), (31, 31)] {
            let _ = r.read_chunk_tag(x, z);
        }
    }
});
