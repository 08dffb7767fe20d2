mod entry;
mod format;
mod index;
mod reader;
mod writer;

pub use entry::{check_placement, Entry, EntrySummary};
pub use format::{
    is_sane_count, FileHeader, PayloadHeader, FORMAT_VERSION, HEADER_SIZE, MAX_ENTRY_COUNT,
    MAX_SUPPORTED_VERSION, PAYLOAD_HEADER_SIZE, SIGNATURE,
};
pub use index::{
    build_index_region, parse_entries, read_index, serialize_records, IndexRecord,
    MAX_NAME_BYTES, NAME_FIELD_SIZE, RECORD_SIZE,
};
pub use reader::{list, unpack, ArchiveReader, UnpackReport};
pub use writer::{pack, pack_with, ArchiveWriter, PackReport};
