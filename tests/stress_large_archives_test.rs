//! Large archive stress tests
//!
//! Run with: cargo test --test stress_large_archives_test -- --ignored --nocapture

use mpk_rs::{pack, unpack, ArchiveReader, ArchiveWriter, LiteralDepths, PackOptions};
use std::fs;
use std::time::Instant;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn test_many_small_entries() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut writer = ArchiveWriter::new(PackOptions::new(true, true));
    for i in 0..5_000 {
        writer
            .add_file(&format!("event/{:05}.scr", i), format!("{}", i).as_bytes())
            .unwrap();
    }
    let report = writer.write_file(temp_file.path()).unwrap();
    assert_eq!(report.entries, 5_000);

    let mut reader = ArchiveReader::open(temp_file.path()).unwrap();
    assert_eq!(reader.entry_count(), 5_000);
    assert_eq!(reader.read_file("event/04321.scr").unwrap(), b"4321");
}

#[test]
#[ignore] // Run manually: cargo test test_large_folder_roundtrip -- --ignored
fn test_large_folder_roundtrip() {
    println!("\n🚀 Packing 64 × 1MB files...");
    let source = tempdir().unwrap();
    for i in 0..64u32 {
        let data: Vec<u8> = (0..1024 * 1024u32).map(|j| ((j / 64) ^ i) as u8 & 0x3F).collect();
        fs::write(source.path().join(format!("blob{:02}.bin", i)), data).unwrap();
    }

    let work = tempdir().unwrap();
    let archive = work.path().join("large.mpk");
    let output = work.path().join("out");
    let options = PackOptions::new(true, true).with_literal_depths(LiteralDepths::Adaptive);

    let start = Instant::now();
    let report = pack(source.path(), &archive, &options).unwrap();
    println!("  ✓ Packed {} entries ({} packed) in {:?}", report.entries, report.packed_entries, start.elapsed());
    println!("  Archive size: {} KB", report.archive_size / 1024);
    assert_eq!(report.packed_entries, 64);

    let start = Instant::now();
    let unpacked = unpack(&archive, &output).unwrap();
    println!("  ✓ Unpacked {} bytes in {:?}", unpacked.bytes_written, start.elapsed());
    assert_eq!(unpacked.bytes_written, 64 * 1024 * 1024);

    for i in [0u32, 31, 63] {
        let name = format!("blob{:02}.bin", i);
        assert_eq!(
            fs::read(output.join(&name)).unwrap(),
            fs::read(source.path().join(&name)).unwrap()
        );
    }
}
