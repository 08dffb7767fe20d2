/// Basic example: pack a folder, list it, unpack it
///
/// Run with: cargo run --example basic
use anyhow::Context;
use mpk_rs::{list, pack, unpack, ArchiveReader, PackOptions};
use std::fs;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    println!("=== mpk-rs Basic Example ===\n");

    let source = Path::new("example_basic_src");
    let archive = Path::new("example_basic.mpk");
    let output = Path::new("example_basic_out");

    println!("1. Preparing source folder...");
    create_source(source)?;

    println!("\n2. Packing...");
    let report = pack(source, archive, &PackOptions::default())?;
    println!(
        "   ✓ {} entries, data offset {}, {} bytes",
        report.entries, report.data_offset, report.archive_size
    );

    println!("\n3. Listing:");
    for entry in list(archive)? {
        println!(
            "     - {} ({} bytes stored, {} unpacked)",
            entry.name, entry.size, entry.unpacked_size
        );
    }

    println!("\n4. Reading readme.txt directly:");
    let mut reader = ArchiveReader::open(archive)?;
    let readme = reader.read_file("readme.txt")?;
    println!("     {}", String::from_utf8_lossy(&readme));

    println!("\n5. Unpacking...");
    let unpacked = unpack(archive, output)?;
    println!("   ✓ {} entries, {} bytes written", unpacked.entries, unpacked.bytes_written);

    fs::remove_dir_all(source)?;
    fs::remove_dir_all(output)?;
    fs::remove_file(archive)?;

    println!("\n✓ Example complete!");
    Ok(())
}

fn create_source(root: &Path) -> anyhow::Result<()> {
    let scripts = root.join("scripts");
    fs::create_dir_all(&scripts).with_context(|| format!("creating {}", scripts.display()))?;

    fs::write(root.join("readme.txt"), "This is a readme file for the basic example.")?;
    fs::write(scripts.join("opening.txt"), "@bg title\n@bgm theme\nHello.\n")?;
    fs::write(root.join("blank.bin"), [0u8; 1000])?;
    Ok(())
}
