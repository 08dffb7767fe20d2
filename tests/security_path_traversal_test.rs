//! Path traversal prevention
//!
//! The writer stores names as given; extraction must never leave the
//! output folder whatever the archive claims.

use mpk_rs::{ArchiveReader, ArchiveWriter, MpkError, OsFileSystem, PackOptions};
use std::fs;
use tempfile::tempdir;

/// Helper: in-memory archive with one entry under `name`
fn archive_with_name(name: &str) -> Vec<u8> {
    let mut writer = ArchiveWriter::new(PackOptions::default());
    writer.add_file(name, b"malicious").unwrap();
    writer.finish().unwrap()
}

fn extract(bytes: Vec<u8>) -> (tempfile::TempDir, mpk_rs::Result<mpk_rs::UnpackReport>) {
    let work = tempdir().unwrap();
    let output = work.path().join("out");
    let mut reader = ArchiveReader::from_bytes(bytes).unwrap();
    let result = reader.extract_all(&output, &OsFileSystem);
    (work, result)
}

#[test]
fn test_path_traversal_dot_dot() {
    println!("\n🔒 Testing path traversal with ../");

    for name in ["../../etc/passwd", "..\\..\\evil.txt", "a/../../evil.txt", ".."] {
        let (work, result) = extract(archive_with_name(name));
        assert!(
            matches!(result, Err(MpkError::UnsafePath(_))),
            "{} was extracted",
            name
        );
        assert!(!work.path().join("evil.txt").exists());
        println!("  ✅ {} rejected", name);
    }
}

#[test]
fn test_absolute_path_unix() {
    println!("\n🔒 Testing absolute Unix path (/etc/passwd)");

    let (_work, result) = extract(archive_with_name("/etc/passwd"));
    assert!(matches!(result, Err(MpkError::UnsafePath(_))));
}

#[test]
fn test_absolute_path_windows() {
    println!("\n🔒 Testing absolute Windows path (C:\\Windows\\...)");

    for name in ["C:\\Windows\\System32\\evil.dll", "\\\\server\\share\\evil.dll", "D:evil.dll"] {
        let (_work, result) = extract(archive_with_name(name));
        assert!(
            matches!(result, Err(MpkError::UnsafePath(_))),
            "{} was extracted",
            name
        );
    }
}

#[test]
fn test_dots_inside_names_are_allowed() {
    let (work, result) = extract(archive_with_name("save..backup/slot..1.dat"));
    assert_eq!(result.unwrap().entries, 1);
    assert_eq!(
        fs::read(work.path().join("out").join("save..backup").join("slot..1.dat")).unwrap(),
        b"malicious"
    );
}

#[test]
fn test_unsafe_entry_stops_extraction_early() {
    let mut writer = ArchiveWriter::new(PackOptions::default());
    writer.add_file("ok.txt", b"fine").unwrap();
    writer.add_file("../escape.txt", b"bad").unwrap();
    writer.add_file("never.txt", b"unreached").unwrap();

    let (work, result) = extract(writer.finish().unwrap());
    assert!(result.is_err());
    assert!(work.path().join("out").join("ok.txt").exists());
    assert!(!work.path().join("escape.txt").exists());
    assert!(!work.path().join("out").join("never.txt").exists());
}

#[test]
fn test_name_limits_on_write() {
    let mut writer = ArchiveWriter::new(PackOptions::default());
    writer.add_file(&"x".repeat(0xF7), b"fits").unwrap();

    let mut writer = ArchiveWriter::new(PackOptions::default());
    let result = writer.add_file(&"x".repeat(0xF8), b"too long");
    assert!(matches!(result, Err(MpkError::NameTooLong { len: 0xF8, max: 0xF7 })));
}

#[test]
fn test_unmappable_name_rejected() {
    let mut writer = ArchiveWriter::new(PackOptions::default());
    // Emoji have no Shift_JIS mapping
    let result = writer.add_file("smile😀.txt", b"data");
    assert!(matches!(result, Err(MpkError::NameEncoding(_))));
}
