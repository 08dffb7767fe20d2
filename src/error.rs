use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for MPK operations
pub type Result<T> = std::result::Result<T, MpkError>;

/// Broad failure classes used by callers to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Corrupt or unsupported archive contents. Always fatal.
    Format,
    /// Filesystem or stream failure. Always fatal.
    Io,
    /// An encode attempt failed. Recoverable while packing.
    Compression,
}

/// Unified error type for all MPK operations
#[derive(Debug, Error)]
pub enum MpkError {
    // Header errors
    #[error("Invalid archive signature: {0:02x?}")]
    InvalidSignature([u8; 2]),

    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(u8),

    #[error("Invalid entry count: {0}")]
    InvalidEntryCount(i64),

    #[error("Invalid data offset: {offset} (file length {file_len})")]
    InvalidDataOffset { offset: u64, file_len: u64 },

    // Index errors
    #[error("Zero size detected for entry {name} (index {index}, position {position} in index)")]
    ZeroSizeEntry {
        name: String,
        index: usize,
        position: usize,
    },

    #[error(
        "Invalid file placement for entry {name} (index {index}, offset {offset}, size {size}, max offset {max_offset})"
    )]
    InvalidPlacement {
        name: String,
        index: usize,
        offset: u64,
        size: u64,
        max_offset: u64,
    },

    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    // Codec errors
    #[error("Corrupt block stream: {0}")]
    CorruptStream(String),

    #[error("Unsupported code-length table with {0} explicit symbols")]
    UnsupportedCodeLengths(u32),

    #[error("Unsupported match symbol {0} in literal-only stream")]
    UnsupportedSymbol(u16),

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    // Name errors
    #[error("Entry name cannot be represented in the legacy code page: {0}")]
    NameEncoding(String),

    #[error("Entry name too long: {len} bytes (max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("Unsafe entry path: {0}")]
    UnsafePath(String),

    // Pack errors
    #[error("Source folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("No files found in source folder: {}", .0.display())]
    EmptySource(PathBuf),

    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MpkError {
    /// Wrap an I/O error with the path it occurred on
    pub fn file_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MpkError::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MpkError::Io(_)
            | MpkError::FileIo { .. }
            | MpkError::SourceNotFound(_)
            | MpkError::EmptySource(_) => ErrorKind::Io,
            MpkError::CompressionFailed(_) => ErrorKind::Compression,
            _ => ErrorKind::Format,
        }
    }

    pub fn is_format_error(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

impl From<toml::de::Error> for MpkError {
    fn from(err: toml::de::Error) -> Self {
        MpkError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MpkError {
    fn from(err: toml::ser::Error) -> Self {
        MpkError::Config(err.to_string())
    }
}
