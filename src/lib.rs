//! mpk-rs: reader and writer for MPK game-data archives
//!
//! An MPK archive is a single file holding many named entries:
//! - A 12-byte header ("MP", version, entry count, data offset)
//! - An index of fixed-width records, optionally block-codec compressed
//! - One payload per entry, each behind a 9-byte payload header
//!
//! Payloads and the index may be compressed with a block-based canonical
//! Huffman codec ([`codec`]). Compressed forms are only kept when they are
//! strictly smaller than the original bytes.
//!
//! # Example
//!
//! ```no_run
//! use mpk_rs::{ArchiveReader, ArchiveWriter, PackOptions};
//!
//! // Create an archive
//! let mut writer = ArchiveWriter::new(PackOptions::default());
//! writer.add_file("data.txt", b"Hello, World!")?;
//! writer.write_file("example.mpk")?;
//!
//! // Read from archive
//! let mut reader = ArchiveReader::open("example.mpk")?;
//! let data = reader.read_file("data.txt")?;
//! # Ok::<(), mpk_rs::error::MpkError>(())
//! ```

// Core modules
pub mod archive;
pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod names;

// Re-export commonly used types
pub use archive::{
    check_placement, is_sane_count, list, pack, pack_with, unpack, ArchiveReader, ArchiveWriter,
    Entry, EntrySummary, FileHeader, PackReport, PayloadHeader, UnpackReport, HEADER_SIZE,
    PAYLOAD_HEADER_SIZE, RECORD_SIZE, SIGNATURE,
};
pub use codec::{compress_if_smaller, decode, encode, encode_with, LiteralDepths, StoredData};
pub use config::PackOptions;
pub use error::{ErrorKind, MpkError, Result};
pub use fs::{FileSystem, OsFileSystem};
pub use names::{NameCodec, ShiftJis};
