use crate::error::{MpkError, Result};
use std::io::{Read, Write};

/// Archive signature "MP"
pub const SIGNATURE: [u8; 2] = *b"MP";

/// Highest version byte this reader accepts
pub const MAX_SUPPORTED_VERSION: u8 = 1;

/// Version byte written by [`crate::ArchiveWriter`]
pub const FORMAT_VERSION: u8 = 0;

/// Archive header size in bytes
pub const HEADER_SIZE: usize = 12;

/// Payload header size (precedes the index and every entry)
pub const PAYLOAD_HEADER_SIZE: usize = 9;

/// Largest entry count considered sane
pub const MAX_ENTRY_COUNT: i64 = 400_000;

/// Whether `count` lies in the accepted 1..=400000 range
pub fn is_sane_count(count: i64) -> bool {
    count > 0 && count <= MAX_ENTRY_COUNT
}

/// Archive header
///
/// Layout (12 bytes):
/// - Signature: "MP" (2 bytes)
/// - Version: uint8
/// - Reserved: 1 byte
/// - Entry Count: uint32 LE
/// - Data Offset: uint32 LE, end of the index region and start of the first payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u8,
    pub entry_count: u32,
    pub data_offset: u32,
}

impl FileHeader {
    pub fn new(entry_count: u32, data_offset: u32) -> Self {
        Self {
            version: FORMAT_VERSION,
            entry_count,
            data_offset,
        }
    }

    /// Write header to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&SIGNATURE)?;
        writer.write_all(&[self.version, 0])?;
        writer.write_all(&self.entry_count.to_le_bytes())?;
        writer.write_all(&self.data_offset.to_le_bytes())?;
        Ok(())
    }

    /// Read and validate a header against the total archive length
    pub fn read_from<R: Read>(mut reader: R, file_len: u64) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut buf)?;
        Self::parse(&buf, file_len)
    }

    /// Validate header bytes against the total archive length
    pub fn parse(buf: &[u8; HEADER_SIZE], file_len: u64) -> Result<Self> {
        let signature = [buf[0], buf[1]];
        if signature != SIGNATURE {
            return Err(MpkError::InvalidSignature(signature));
        }

        let version = buf[2];
        if version > MAX_SUPPORTED_VERSION {
            return Err(MpkError::UnsupportedVersion(version));
        }

        let entry_count = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        // The count is signed on disk; anything past i32::MAX is negative
        let signed_count = i64::from(entry_count as i32);
        if !is_sane_count(signed_count) {
            return Err(MpkError::InvalidEntryCount(signed_count));
        }

        let data_offset = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        if u64::from(data_offset) <= HEADER_SIZE as u64 || u64::from(data_offset) >= file_len {
            return Err(MpkError::InvalidDataOffset {
                offset: u64::from(data_offset),
                file_len,
            });
        }

        Ok(Self {
            version,
            entry_count,
            data_offset,
        })
    }

    /// Length of the index region, payload header included
    pub fn index_region_len(&self) -> usize {
        self.data_offset as usize - HEADER_SIZE
    }
}

/// Header in front of the index blob and of every entry payload
///
/// Layout (9 bytes):
/// - Unpacked Size: uint32 **BE**
/// - Reserved: 4 bytes
/// - Packed Flag: uint8, non-zero when the bytes that follow are codec output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadHeader {
    pub unpacked_size: u32,
    pub packed: bool,
}

impl PayloadHeader {
    pub fn new(unpacked_size: u32, packed: bool) -> Self {
        Self {
            unpacked_size,
            packed,
        }
    }

    pub fn to_bytes(&self) -> [u8; PAYLOAD_HEADER_SIZE] {
        let mut buf = [0u8; PAYLOAD_HEADER_SIZE];
        buf[..4].copy_from_slice(&self.unpacked_size.to_be_bytes());
        buf[8] = u8::from(self.packed);
        buf
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn from_bytes(buf: &[u8; PAYLOAD_HEADER_SIZE]) -> Self {
        Self {
            unpacked_size: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            packed: buf[8] != 0,
        }
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; PAYLOAD_HEADER_SIZE];
        reader.read_exact(&mut buf)?;
        Ok(Self::from_bytes(&buf))
    }
}
