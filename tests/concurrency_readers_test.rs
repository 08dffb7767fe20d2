//! Multi-reader tests
//!
//! Readers are independent values over their own file handle, so any number
//! of them can work on the same archive at once.

use mpk_rs::{ArchiveReader, ArchiveWriter, LiteralDepths, PackOptions};
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

/// Helper: Create archive with N files
fn create_archive_with_files(file_count: usize) -> NamedTempFile {
    let temp_file = NamedTempFile::new().unwrap();

    let options = PackOptions::new(true, true).with_literal_depths(LiteralDepths::Adaptive);
    let mut writer = ArchiveWriter::new(options);
    for i in 0..file_count {
        let filename = format!("dir{}/file{}.txt", i % 5, i);
        let data = format!("data{} ", i).repeat(50);
        writer.add_file(&filename, data.as_bytes()).unwrap();
    }
    writer.write_file(temp_file.path()).unwrap();

    temp_file
}

#[test]
fn test_concurrent_readers() {
    let temp_file = create_archive_with_files(100);
    let path = Arc::new(temp_file.path().to_path_buf());

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let path = Arc::clone(&path);
            thread::spawn(move || {
                let mut reader = ArchiveReader::open(path.as_path()).unwrap();
                assert_eq!(reader.entry_count(), 100);
                for i in (t..100).step_by(7) {
                    let name = format!("dir{}/file{}.txt", i % 5, i);
                    let data = reader.read_file(&name).unwrap();
                    assert_eq!(data, format!("data{} ", i).repeat(50).as_bytes());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_reader_moves_between_threads() {
    let temp_file = create_archive_with_files(10);
    let mut reader = ArchiveReader::open(temp_file.path()).unwrap();
    let first = reader.read_file("dir0/file0.txt").unwrap();

    let handle = thread::spawn(move || {
        let again = reader.read_file("dir0/file0.txt").unwrap();
        (reader.entry_count(), again)
    });
    let (count, again) = handle.join().unwrap();
    assert_eq!(count, 10);
    assert_eq!(first, again);
}
