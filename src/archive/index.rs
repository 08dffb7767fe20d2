use crate::archive::entry::Entry;
use crate::archive::format::{PayloadHeader, PAYLOAD_HEADER_SIZE};
use crate::codec::{self, LiteralDepths, StoredData};
use crate::error::{MpkError, Result};
use crate::names::NameCodec;
use tracing::debug;

/// Name field width in an index record
pub const NAME_FIELD_SIZE: usize = 0xF8;

/// Longest encoded name; the last byte of the field stays a terminator
pub const MAX_NAME_BYTES: usize = NAME_FIELD_SIZE - 1;

/// Index record size in bytes
pub const RECORD_SIZE: usize = NAME_FIELD_SIZE + 12;

/// Index record as stored in the (decoded) index
///
/// Structure (0x104 bytes):
/// - Name: 0xF8 bytes, legacy-encoded, null-terminated, zero-padded
/// - Offset: uint32 LE, relative to the header's data offset
/// - Size: uint32 LE, payload header included
/// - Unpacked Size: uint32 LE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub name: Vec<u8>,
    pub offset: u32,
    pub size: u32,
    pub unpacked_size: u32,
}

impl IndexRecord {
    /// Append the fixed-width record to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.name.len() > MAX_NAME_BYTES {
            return Err(MpkError::NameTooLong {
                len: self.name.len(),
                max: MAX_NAME_BYTES,
            });
        }
        let mut field = [0u8; NAME_FIELD_SIZE];
        field[..self.name.len()].copy_from_slice(&self.name);
        out.extend_from_slice(&field);
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.unpacked_size.to_le_bytes());
        Ok(())
    }

    /// Parse one record from exactly [`RECORD_SIZE`] bytes
    pub fn parse(buf: &[u8; RECORD_SIZE]) -> Self {
        let field = &buf[..NAME_FIELD_SIZE];
        let name_len = field.iter().position(|&b| b == 0).unwrap_or(NAME_FIELD_SIZE);
        let u32_at = |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);

        Self {
            name: field[..name_len].to_vec(),
            offset: u32_at(NAME_FIELD_SIZE),
            size: u32_at(NAME_FIELD_SIZE + 4),
            unpacked_size: u32_at(NAME_FIELD_SIZE + 8),
        }
    }
}

/// Recover the flat index from the region between the header and the data offset
pub fn read_index(region: &[u8]) -> Result<Vec<u8>> {
    let header_bytes: &[u8; PAYLOAD_HEADER_SIZE] = region
        .get(..PAYLOAD_HEADER_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            MpkError::InvalidFormat(format!(
                "index region of {} bytes cannot hold its payload header",
                region.len()
            ))
        })?;
    let header = PayloadHeader::from_bytes(header_bytes);
    let body = &region[PAYLOAD_HEADER_SIZE..];
    let unpacked_size = header.unpacked_size as usize;

    if header.packed {
        debug!(packed = body.len(), unpacked = unpacked_size, "decoding packed index");
        return codec::decode(body, unpacked_size);
    }

    body.get(..unpacked_size).map(<[u8]>::to_vec).ok_or_else(|| {
        MpkError::InvalidFormat(format!(
            "raw index claims {} bytes but the region holds {}",
            unpacked_size,
            body.len()
        ))
    })
}

/// Parse and validate `count` records from a flat index
pub fn parse_entries(
    index: &[u8],
    count: usize,
    data_offset: u64,
    file_len: u64,
    names: &dyn NameCodec,
) -> Result<Vec<Entry>> {
    let needed = count.checked_mul(RECORD_SIZE).unwrap_or(usize::MAX);
    if index.len() < needed {
        return Err(MpkError::InvalidFormat(format!(
            "index holds {} bytes, {} records need {}",
            index.len(),
            count,
            needed
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let position = i * RECORD_SIZE;
        let chunk: &[u8; RECORD_SIZE] = index
            .get(position..position + RECORD_SIZE)
            .and_then(|c| c.try_into().ok())
            .ok_or_else(|| MpkError::InvalidFormat(format!("index record {} is truncated", i)))?;
        let record = IndexRecord::parse(chunk);
        let name = names.decode_name(&record.name)?;

        if record.size == 0 {
            return Err(MpkError::ZeroSizeEntry {
                name,
                index: i,
                position,
            });
        }

        let entry = Entry {
            name,
            offset: data_offset + u64::from(record.offset),
            size: record.size,
            unpacked_size: record.unpacked_size,
        };

        if !entry.check_placement(file_len) {
            return Err(MpkError::InvalidPlacement {
                name: entry.name,
                index: i,
                offset: entry.offset,
                size: u64::from(entry.size),
                max_offset: file_len,
            });
        }

        entries.push(entry);
    }

    Ok(entries)
}

/// Serialize records into one flat buffer
pub fn serialize_records(records: &[IndexRecord]) -> Result<Vec<u8>> {
    let mut flat = Vec::with_capacity(records.len() * RECORD_SIZE);
    for record in records {
        record.write_to(&mut flat)?;
    }
    Ok(flat)
}

/// Index region bytes: payload header followed by raw or packed records
pub fn build_index_region(flat: &[u8], compress: bool, mode: LiteralDepths) -> Result<Vec<u8>> {
    let unpacked_size = u32::try_from(flat.len())
        .map_err(|_| MpkError::InvalidFormat(format!("index of {} bytes is too large", flat.len())))?;

    let stored = if compress {
        codec::compress_if_smaller(flat, mode)
    } else {
        StoredData::Raw(flat.to_vec())
    };
    debug!(raw = flat.len(), stored = stored.len(), packed = stored.is_packed(), "built index");

    let mut region = Vec::with_capacity(PAYLOAD_HEADER_SIZE + stored.len());
    region.extend_from_slice(&PayloadHeader::new(unpacked_size, stored.is_packed()).to_bytes());
    region.extend_from_slice(stored.bytes());
    Ok(region)
}
