#![no_main]

use libfuzzer_sys::fuzz_target;
use mpk_rs::ArchiveReader;

fuzz_target!(|data: &[u8]| {
    // Header is 12 bytes minimum
    if data.len() < 12 {
        return;
    }

    // Opening validates header, index and placement - should never panic
    let mut reader = match ArchiveReader::from_bytes(data.to_vec()) {
        Ok(r) => r,
        Err(_) => return,
    };

    let entries = reader.entries().to_vec();
    for entry in &entries {
        let _ = reader.read_entry(entry);
    }

    let _ = reader.listing_json();
    let _ = reader.find("");
    let _ = reader.find("../../../etc/passwd");
});
