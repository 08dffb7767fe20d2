/// Example comparing storage settings
///
/// Run with: cargo run --example compression
use mpk_rs::{ArchiveReader, ArchiveWriter, LiteralDepths, PackOptions};

fn main() -> anyhow::Result<()> {
    println!("=== mpk-rs Compression Example ===\n");

    let small_data = b"Small file content".to_vec();
    let medium_text = "Lorem ipsum ".repeat(500).into_bytes();
    let large_data = vec![0u8; 100_000];
    let files = [
        ("small.txt", small_data),
        ("medium.txt", medium_text),
        ("large.bin", large_data),
    ];

    let settings = [
        ("stored", PackOptions::new(false, false)),
        ("uniform", PackOptions::new(true, true)),
        (
            "adaptive",
            PackOptions::new(true, true).with_literal_depths(LiteralDepths::Adaptive),
        ),
    ];

    println!("{:<10} {:>10} {:>8} {:>12}", "settings", "size", "packed", "index");
    for (label, options) in settings {
        let mut writer = ArchiveWriter::new(options);
        for (name, data) in &files {
            writer.add_file(name, data)?;
        }

        let mut bytes = Vec::new();
        let report = writer.write_to(&mut bytes)?;
        println!(
            "{:<10} {:>10} {:>8} {:>12}",
            label,
            report.archive_size,
            report.packed_entries,
            if report.index_packed { "packed" } else { "raw" }
        );

        let mut reader = ArchiveReader::from_bytes(bytes)?;
        for (name, data) in &files {
            anyhow::ensure!(&reader.read_file(name)? == data, "{} did not roundtrip", name);
        }
    }

    println!("\n✓ Example complete!");
    Ok(())
}
