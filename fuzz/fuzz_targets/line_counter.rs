#![no_main]

use kwtally::{count_line, KeywordSet};
use libfuzzer_sys::fuzz_target;

// First line of input is a comma separated keyword list, the rest is the line to scan.
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let (list, line) = text.split_once('\n').unwrap_or((&*text, ""));
    let Ok(keywords) = KeywordSet::new(list.split(',')) else {
        return;
    };

    let counts = count_line(line, &keywords);
    assert!(counts.len() <= keywords.len());
    assert!(counts.values().all(|&n| n == 1));
});
