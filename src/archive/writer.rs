use crate::archive::format::{
    is_sane_count, FileHeader, PayloadHeader, HEADER_SIZE, PAYLOAD_HEADER_SIZE,
};
use crate::archive::index::{build_index_region, serialize_records, IndexRecord, MAX_NAME_BYTES};
use crate::codec::{self, StoredData};
use crate::config::PackOptions;
use crate::error::{MpkError, Result};
use crate::fs::{entry_name_for, FileSystem, OsFileSystem};
use crate::names::{NameCodec, ShiftJis};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of a pack run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackReport {
    pub entries: usize,
    pub packed_entries: usize,
    pub index_packed: bool,
    pub data_offset: u32,
    pub archive_size: u64,
}

/// A file after its keep-smaller encode, waiting for layout
#[derive(Debug, Clone)]
struct PreparedEntry {
    name: String,
    name_bytes: Vec<u8>,
    unpacked_size: u32,
    stored: StoredData,
}

impl PreparedEntry {
    fn new(name: &str, data: &[u8], options: &PackOptions, names: &dyn NameCodec) -> Result<Self> {
        let name_bytes = names.encode_name(name)?;
        if name_bytes.len() > MAX_NAME_BYTES {
            return Err(MpkError::NameTooLong {
                len: name_bytes.len(),
                max: MAX_NAME_BYTES,
            });
        }
        if name_bytes.is_empty() {
            return Err(MpkError::UnsafePath(name.to_string()));
        }

        let unpacked_size = u32::try_from(data.len()).map_err(|_| {
            MpkError::InvalidFormat(format!("{} is too large ({} bytes)", name, data.len()))
        })?;

        let stored = if options.compress_files {
            codec::compress_if_smaller(data, options.literal_depths)
        } else {
            StoredData::Raw(data.to_vec())
        };
        debug!(
            name,
            raw = data.len(),
            stored = stored.len(),
            packed = stored.is_packed(),
            "prepared entry"
        );

        Ok(Self {
            name: name.to_string(),
            name_bytes,
            unpacked_size,
            stored,
        })
    }

    /// On-disk length, payload header included
    fn payload_len(&self) -> usize {
        self.stored.len() + PAYLOAD_HEADER_SIZE
    }
}

/// Index records for `entries`, with offsets assigned in order
fn layout(entries: &[PreparedEntry]) -> Result<Vec<IndexRecord>> {
    let mut offset: u32 = 0;
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let size = u32::try_from(entry.payload_len()).map_err(|_| {
            MpkError::InvalidFormat(format!("{} does not fit a 32-bit size", entry.name))
        })?;
        records.push(IndexRecord {
            name: entry.name_bytes.clone(),
            offset,
            size,
            unpacked_size: entry.unpacked_size,
        });
        offset = offset.checked_add(size).ok_or_else(|| {
            MpkError::InvalidFormat("archive payloads exceed the 32-bit offset range".to_string())
        })?;
    }

    Ok(records)
}

/// Emit header, index region and payloads for already encoded `entries`
fn write_archive<W: Write>(
    entries: &[PreparedEntry],
    options: &PackOptions,
    mut writer: W,
) -> Result<PackReport> {
    let count = entries.len();
    if !is_sane_count(count as i64) {
        return Err(MpkError::InvalidEntryCount(count as i64));
    }

    let records = layout(entries)?;
    let flat = serialize_records(&records)?;
    let region = build_index_region(&flat, options.compress_index, options.literal_depths)?;
    let index_packed = region[PAYLOAD_HEADER_SIZE - 1] != 0;

    let data_offset = u32::try_from(HEADER_SIZE + region.len()).map_err(|_| {
        MpkError::InvalidFormat(format!("index of {} bytes is too large", region.len()))
    })?;
    FileHeader::new(count as u32, data_offset).write_to(&mut writer)?;
    writer.write_all(&region)?;

    let mut archive_size = u64::from(data_offset);
    let mut packed_entries = 0;
    for entry in entries {
        PayloadHeader::new(entry.unpacked_size, entry.stored.is_packed()).write_to(&mut writer)?;
        writer.write_all(entry.stored.bytes())?;
        archive_size += entry.payload_len() as u64;
        packed_entries += usize::from(entry.stored.is_packed());
    }
    writer.flush()?;

    Ok(PackReport {
        entries: count,
        packed_entries,
        index_packed,
        data_offset,
        archive_size,
    })
}

/// Archive writer
///
/// Each added file is encoded immediately. Offsets, the index and the data
/// offset are derived from the full list only when the archive is written.
pub struct ArchiveWriter {
    options: PackOptions,
    names: Box<dyn NameCodec>,
    entries: Vec<PreparedEntry>,
}

impl ArchiveWriter {
    pub fn new(options: PackOptions) -> Self {
        Self::with_name_codec(options, Box::new(ShiftJis))
    }

    pub fn with_name_codec(options: PackOptions, names: Box<dyn NameCodec>) -> Self {
        Self {
            options,
            names,
            entries: Vec::new(),
        }
    }

    pub fn options(&self) -> &PackOptions {
        &self.options
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Add a file under archive name `name`
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let entry = PreparedEntry::new(name, data, &self.options, self.names.as_ref())?;
        self.entries.push(entry);
        Ok(())
    }

    /// Add a file from disk
    pub fn add_file_from_disk(&mut self, name: &str, disk_path: &Path) -> Result<()> {
        let data = std::fs::read(disk_path).map_err(|e| MpkError::file_io(disk_path, e))?;
        self.add_file(name, &data)
    }

    /// Lay out and emit the archive
    pub fn write_to<W: Write>(self, writer: W) -> Result<PackReport> {
        write_archive(&self.entries, &self.options, writer)
    }

    /// Lay out the archive into memory
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Lay out the archive into a new file at `path`
    pub fn write_file<P: AsRef<Path>>(self, path: P) -> Result<PackReport> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| MpkError::file_io(path, e))?;
        self.write_to(BufWriter::new(file))
    }
}

/// Pack every file below `input_folder` into a new archive at `archive_path`
pub fn pack<P: AsRef<Path>, Q: AsRef<Path>>(
    input_folder: P,
    archive_path: Q,
    options: &PackOptions,
) -> Result<PackReport> {
    pack_with(input_folder, archive_path, options, &OsFileSystem, &ShiftJis)
}

/// [`pack`] with explicit filesystem and name codec
pub fn pack_with<P: AsRef<Path>, Q: AsRef<Path>>(
    input_folder: P,
    archive_path: Q,
    options: &PackOptions,
    fs: &dyn FileSystem,
    names: &dyn NameCodec,
) -> Result<PackReport> {
    let input = input_folder.as_ref();
    let archive_path = archive_path.as_ref();

    if !fs.is_dir(input) {
        return Err(MpkError::SourceNotFound(input.to_path_buf()));
    }
    let files = fs.list_files(input)?;
    if files.is_empty() {
        return Err(MpkError::EmptySource(input.to_path_buf()));
    }

    let prepare = |relative: &PathBuf| -> Result<PreparedEntry> {
        let name = entry_name_for(relative)?;
        let data = fs.read_file(&input.join(relative))?;
        PreparedEntry::new(&name, &data, options, names)
    };

    // Encoding is independent per file; offsets are assigned afterwards in order
    #[cfg(feature = "parallel")]
    let entries = files.par_iter().map(prepare).collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let entries = files.iter().map(prepare).collect::<Result<Vec<_>>>()?;

    let file = File::create(archive_path).map_err(|e| MpkError::file_io(archive_path, e))?;
    let report = write_archive(&entries, options, BufWriter::new(file))
        .map_err(|e| match e {
            MpkError::Io(source) => MpkError::file_io(archive_path, source),
            other => other,
        })?;

    info!(
        archive = %archive_path.display(),
        entries = report.entries,
        packed = report.packed_entries,
        index_packed = report.index_packed,
        size = report.archive_size,
        "packed archive"
    );
    Ok(report)
}
