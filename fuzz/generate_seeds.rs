//! Generate seed corpus for fuzzing

use mpk_rs::{ArchiveWriter, LiteralDepths, PackOptions};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let corpus_dir = "fuzz/corpus/fuzz_archive_parse";
    fs::create_dir_all(corpus_dir)?;

    println!("Generating seed corpus...");

    let adaptive = PackOptions::new(true, true).with_literal_depths(LiteralDepths::Adaptive);
    let seeds: Vec<(&str, PackOptions, Vec<(&str, Vec<u8>)>)> = vec![
        ("single_small", PackOptions::default(), vec![("test.txt", b"Hello, World!".to_vec())]),
        (
            "multi",
            PackOptions::new(false, false),
            vec![
                ("file1.txt", b"First file".to_vec()),
                ("file2.txt", b"Second file".to_vec()),
                ("dir/file3.txt", b"Third file in directory".to_vec()),
            ],
        ),
        (
            "packed",
            adaptive.clone(),
            vec![("large.txt", b"This is test data for compression. ".repeat(1000))],
        ),
        ("binary", adaptive, vec![("binary.bin", (0..=255).collect())]),
        ("zero_length", PackOptions::default(), vec![("empty.txt", Vec::new())]),
    ];

    let count = seeds.len();
    for (label, options, files) in seeds {
        let path = format!("{}/seed_{}.mpk", corpus_dir, label);
        let mut writer = ArchiveWriter::new(options);
        for (name, data) in &files {
            writer.add_file(name, data)?;
        }
        writer.write_file(&path)?;
        println!("✓ Generated: {}", path);
    }

    println!("\nGenerated {} seed files in {}", count, corpus_dir);
    Ok(())
}
