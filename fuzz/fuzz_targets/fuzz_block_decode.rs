#![no_main]

use libfuzzer_sys::fuzz_target;
use mpk_rs::codec::decode;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First two bytes pick the expected output size
    let target = usize::from(u16::from_le_bytes([data[0], data[1]]));
    let _ = decode(&data[2..], target);
});
