use crate::archive::entry::{Entry, EntrySummary};
use crate::archive::format::{FileHeader, PayloadHeader, HEADER_SIZE, PAYLOAD_HEADER_SIZE};
use crate::archive::index::{parse_entries, read_index};
use crate::codec::{self, StoredData};
use crate::error::{MpkError, Result};
use crate::fs::{entry_output_path, FileSystem, OsFileSystem};
use crate::names::{NameCodec, ShiftJis};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

/// Outcome of an extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackReport {
    pub entries: usize,
    pub bytes_written: u64,
}

/// Archive reader
///
/// Opening parses the header and the index and validates every entry's
/// placement; payloads are read on demand.
pub struct ArchiveReader<R = BufReader<File>> {
    reader: R,
    header: FileHeader,
    file_len: u64,
    entries: Vec<Entry>,
}

impl ArchiveReader<BufReader<File>> {
    /// Open an archive file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MpkError::file_io(path, e))?;
        Self::from_reader(BufReader::new(file))
    }
}

impl ArchiveReader<Cursor<Vec<u8>>> {
    /// Read an archive held in memory
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::with_name_codec(reader, &ShiftJis)
    }

    /// Parse header and index, decoding names with `names`
    pub fn with_name_codec(mut reader: R, names: &dyn NameCodec) -> Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        if file_len < HEADER_SIZE as u64 {
            return Err(MpkError::InvalidFormat(format!(
                "file of {} bytes is shorter than the {}-byte header",
                file_len, HEADER_SIZE
            )));
        }

        reader.seek(SeekFrom::Start(0))?;
        let header = FileHeader::read_from(&mut reader, file_len)?;

        let mut region = vec![0u8; header.index_region_len()];
        reader.read_exact(&mut region)?;
        let index = read_index(&region)?;

        let entries = parse_entries(
            &index,
            header.entry_count as usize,
            u64::from(header.data_offset),
            file_len,
            names,
        )?;
        debug!(
            entries = entries.len(),
            data_offset = header.data_offset,
            file_len,
            "read archive index"
        );

        Ok(Self {
            reader,
            header,
            file_len,
            entries,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Look an entry up by its archive name
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Read an entry's payload header and stored bytes without decoding
    pub fn read_stored(&mut self, entry: &Entry) -> Result<(PayloadHeader, StoredData)> {
        let body_len = (entry.size as usize)
            .checked_sub(PAYLOAD_HEADER_SIZE)
            .ok_or_else(|| {
                MpkError::InvalidFormat(format!(
                    "entry {} has size {} below the payload header",
                    entry.name, entry.size
                ))
            })?;

        self.reader.seek(SeekFrom::Start(entry.offset))?;
        let header = PayloadHeader::read_from(&mut self.reader)?;

        if header.packed {
            let mut body = vec![0u8; body_len];
            self.reader.read_exact(&mut body)?;
            return Ok((header, StoredData::Packed(body)));
        }

        let unpacked = header.unpacked_size as usize;
        if unpacked > body_len {
            return Err(MpkError::InvalidFormat(format!(
                "entry {} at offset {} stores {} raw bytes in a {}-byte payload",
                entry.name, entry.offset, unpacked, body_len
            )));
        }
        let mut body = vec![0u8; unpacked];
        self.reader.read_exact(&mut body)?;
        Ok((header, StoredData::Raw(body)))
    }

    /// Read and decode an entry
    pub fn read_entry(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        let (header, stored) = self.read_stored(entry)?;
        if header.unpacked_size != entry.unpacked_size {
            debug!(
                name = %entry.name,
                index_size = entry.unpacked_size,
                payload_size = header.unpacked_size,
                "payload header disagrees with index on unpacked size"
            );
        }

        let data = match stored {
            StoredData::Raw(bytes) => bytes,
            StoredData::Packed(bytes) => codec::decode(&bytes, header.unpacked_size as usize)
                .map_err(|e| match e {
                    MpkError::CorruptStream(msg) => MpkError::CorruptStream(format!(
                        "entry {} at offset {}: {}",
                        entry.name, entry.offset, msg
                    )),
                    other => other,
                })?,
        };

        debug!(name = %entry.name, size = entry.size, unpacked = data.len(), "read entry");
        Ok(data)
    }

    /// Read and decode an entry by name
    pub fn read_file(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .find(name)
            .cloned()
            .ok_or_else(|| MpkError::EntryNotFound(name.to_string()))?;
        self.read_entry(&entry)
    }

    /// Write every entry below `output`, creating nested directories
    pub fn extract_all(&mut self, output: &Path, fs: &dyn FileSystem) -> Result<UnpackReport> {
        fs.create_dir_all(output)?;

        let entries = self.entries.clone();
        let mut report = UnpackReport::default();
        for entry in &entries {
            let target = entry_output_path(output, &entry.name)?;
            if let Some(parent) = target.parent() {
                fs.create_dir_all(parent)?;
            }

            let data = self.read_entry(entry)?;
            fs.write_file(&target, &data)?;

            report.entries += 1;
            report.bytes_written += data.len() as u64;
        }

        Ok(report)
    }

    /// Summaries of all entries
    pub fn listing(&self) -> Vec<EntrySummary> {
        self.entries.iter().map(Entry::summary).collect()
    }

    /// Entry listing rendered as pretty JSON
    pub fn listing_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.listing())?)
    }
}

/// Extract every entry of the archive at `archive_path` into `output_folder`
pub fn unpack<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_folder: Q,
) -> Result<UnpackReport> {
    let archive_path = archive_path.as_ref();
    let mut reader = ArchiveReader::open(archive_path)?;
    let report = reader.extract_all(output_folder.as_ref(), &OsFileSystem)?;

    info!(
        archive = %archive_path.display(),
        entries = report.entries,
        bytes = report.bytes_written,
        "unpacked archive"
    );
    Ok(report)
}

/// Validated entry summaries of the archive at `archive_path`
pub fn list<P: AsRef<Path>>(archive_path: P) -> Result<Vec<EntrySummary>> {
    Ok(ArchiveReader::open(archive_path)?.listing())
}
