use serde::Serialize;

/// Bounds check for a byte range inside an archive of `max_offset` bytes
///
/// Holds when the range is non-empty, starts inside the archive and ends at
/// or before its last byte. Sums that overflow are rejected.
pub fn check_placement(offset: u64, size: u64, max_offset: u64) -> bool {
    offset < max_offset
        && size > 0
        && offset
            .checked_add(size)
            .is_some_and(|end| end <= max_offset)
}

/// Validated index entry
///
/// Every entry is framed by a payload header. Whether its body is packed is
/// only known from that header; see [`crate::ArchiveReader::read_stored`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Absolute offset of the payload header
    pub offset: u64,
    /// On-disk length, payload header included
    pub size: u32,
    pub unpacked_size: u32,
}

impl Entry {
    pub fn check_placement(&self, max_offset: u64) -> bool {
        check_placement(self.offset, u64::from(self.size), max_offset)
    }

    /// Listing view of this entry
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            name: self.name.clone(),
            offset: self.offset,
            size: self.size,
            unpacked_size: self.unpacked_size,
        }
    }
}

/// Serializable entry metadata for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub name: String,
    pub offset: u64,
    pub size: u32,
    pub unpacked_size: u32,
}
