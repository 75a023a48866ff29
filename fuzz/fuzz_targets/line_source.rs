#![no_main]

use std::io::Cursor;

use kwtally::LineSource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes may sniff as gzip or zstd; decoder errors are fine, panics are not.
    let Ok(source) = LineSource::from_reader(Cursor::new(data.to_vec()), "fuzz") else {
        return;
    };
    for line in source.lines() {
        match line {
            Ok(l) => assert!(!l.contains('\n')),
            Err(_) => break,
        }
    }
});
