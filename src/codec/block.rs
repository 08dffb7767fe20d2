use crate::codec::bits::{BitReader, BitWriter};
use crate::codec::huffman::{HuffmanTable, MAX_DEPTH, MIN_DEPTH};
use crate::error::{MpkError, Result};
use tracing::trace;

/// Literals per block produced by the encoder
pub const MAX_BLOCK_LITERALS: usize = 0x8000;

/// Size of the code-length alphabet
pub const CODE_LENGTH_SYMBOLS: u32 = 19;

/// Depth slots carried by every literal table: 256 byte values plus
/// room for match-length symbols
pub const LITERAL_TABLE_SIZE: usize = 0x1FE;

/// Raw byte values
pub const LITERAL_SYMBOLS: usize = 256;

const LITERAL_COUNT_BITS: u32 = 16;
const CODE_LENGTH_COUNT_BITS: u32 = 5;
const CODE_LENGTH_SYMBOL_BITS: u32 = 5;
const CODE_LENGTH_REPEAT_BITS: u32 = 2;
const SYMBOL_COUNT_BITS: u32 = 9;
const DEPTH_BITS: u32 = 4;

/// Value of the 9-bit table field in front of a non-empty depth table
pub const TABLE_MARKER: u32 = 9;

/// Code-length table descriptor in its shortcut form
///
/// Signalled by a code-length symbol count of 1. Literal depths then follow
/// as fixed 4-bit fields rather than being coded through a second tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutDescriptor {
    pub symbol: u8,
    pub repeat: u8,
}

impl ShortcutDescriptor {
    fn write(&self, writer: &mut BitWriter) {
        writer.write_bits(1, CODE_LENGTH_COUNT_BITS);
        writer.write_bits(u32::from(self.symbol), CODE_LENGTH_SYMBOL_BITS);
        writer.write_bits(u32::from(self.repeat), CODE_LENGTH_REPEAT_BITS);
    }

    fn read(reader: &mut BitReader<'_>) -> Result<Self> {
        let count = reader.read_bits(CODE_LENGTH_COUNT_BITS)?;
        if count != 1 {
            return Err(MpkError::UnsupportedCodeLengths(count));
        }
        let symbol = reader.read_bits(CODE_LENGTH_SYMBOL_BITS)?;
        if symbol >= CODE_LENGTH_SYMBOLS {
            return Err(MpkError::CorruptStream(format!(
                "code-length symbol {} out of range",
                symbol
            )));
        }
        let repeat = reader.read_bits(CODE_LENGTH_REPEAT_BITS)?;
        Ok(Self {
            symbol: symbol as u8,
            repeat: repeat as u8,
        })
    }
}

/// Write the literal depth table: the table marker, then one 4-bit field
/// per slot
///
/// Every slot up to the last present symbol must carry a depth, and that
/// last depth must not be [`MIN_DEPTH`]: its field would be 0 and read back
/// as an absent trailing slot.
fn write_depth_table(writer: &mut BitWriter, depths: &[u8]) -> Result<()> {
    let present = depths.iter().rposition(|&d| d > 0).map_or(0, |i| i + 1);
    if present == 0 || present > LITERAL_TABLE_SIZE {
        return Err(MpkError::CompressionFailed(format!(
            "{} symbols do not fit the literal table",
            present
        )));
    }
    if depths[present - 1] == MIN_DEPTH {
        return Err(MpkError::CompressionFailed(format!(
            "last symbol {} cannot use depth {}",
            present - 1,
            MIN_DEPTH
        )));
    }

    writer.write_bits(TABLE_MARKER, SYMBOL_COUNT_BITS);
    for slot in 0..LITERAL_TABLE_SIZE {
        let field = match depths.get(slot) {
            Some(&depth) if slot < present => {
                if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
                    return Err(MpkError::CompressionFailed(format!(
                        "symbol {} has unrepresentable depth {}",
                        slot, depth
                    )));
                }
                depth - MIN_DEPTH
            }
            _ => 0,
        };
        writer.write_bits(u32::from(field), DEPTH_BITS);
    }
    Ok(())
}

/// Read the table marker and the depth fields
///
/// The run of zero fields at the end of the table is absent; every field
/// before the last non-zero one is `depth - 2`.
fn read_depth_table(reader: &mut BitReader<'_>) -> Result<Vec<u8>> {
    let marker = reader.read_bits(SYMBOL_COUNT_BITS)?;
    if marker == 0 {
        return Err(MpkError::CorruptStream(
            "non-empty block without a literal table".to_string(),
        ));
    }

    let mut fields = [0u8; LITERAL_TABLE_SIZE];
    for field in fields.iter_mut() {
        *field = reader.read_bits(DEPTH_BITS)? as u8;
    }

    let present = fields.iter().rposition(|&f| f > 0).map_or(0, |i| i + 1);
    if present == 0 {
        return Err(MpkError::CorruptStream("literal table is empty".to_string()));
    }
    Ok(fields[..present].iter().map(|&f| f + MIN_DEPTH).collect())
}

/// Encode one block of literals with the given per-literal depths
///
/// The block ends on a byte boundary, so every block starts with its
/// literal count in two whole little-endian bytes.
pub fn encode_block(writer: &mut BitWriter, literals: &[u8], depths: &[u8]) -> Result<()> {
    if literals.is_empty() || literals.len() > usize::from(u16::MAX) {
        return Err(MpkError::CompressionFailed(format!(
            "block of {} literals does not fit the 16-bit count",
            literals.len()
        )));
    }
    if depths.len() > LITERAL_SYMBOLS {
        return Err(MpkError::CompressionFailed(
            "match symbols are not produced by this encoder".to_string(),
        ));
    }

    let table = HuffmanTable::from_depths(depths)
        .map_err(|e| MpkError::CompressionFailed(e.to_string()))?;

    writer.write_bits(literals.len() as u32, LITERAL_COUNT_BITS);
    ShortcutDescriptor::default().write(writer);
    write_depth_table(writer, depths)?;

    for &byte in literals {
        table.write_symbol(writer, byte as usize)?;
    }
    writer.align();

    trace!(literals = literals.len(), bits = writer.bit_len(), "encoded block");
    Ok(())
}

/// Decode one block, appending at most `budget` bytes to `out`
pub fn decode_block(reader: &mut BitReader<'_>, out: &mut Vec<u8>, budget: usize) -> Result<usize> {
    let literal_count = reader.read_bits(LITERAL_COUNT_BITS)? as usize;
    if literal_count == 0 {
        return Err(MpkError::CorruptStream("empty block".to_string()));
    }
    if literal_count > budget {
        return Err(MpkError::CorruptStream(format!(
            "block of {} literals overruns the expected size by {}",
            literal_count,
            literal_count - budget
        )));
    }

    ShortcutDescriptor::read(reader)?;
    let depths = read_depth_table(reader)?;
    let table = HuffmanTable::from_depths(&depths)?;

    for _ in 0..literal_count {
        let symbol = table.read_symbol(reader)?;
        if usize::from(symbol) >= LITERAL_SYMBOLS {
            return Err(MpkError::UnsupportedSymbol(symbol));
        }
        out.push(symbol as u8);
    }
    reader.align();

    trace!(literals = literal_count, "decoded block");
    Ok(literal_count)
}
