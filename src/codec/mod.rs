//! Block-based canonical Huffman codec used for the index and entry payloads
//!
//! A stream is a sequence of independently framed blocks. Each block carries
//! its literal count, a code-length descriptor, a depth table for the literal
//! alphabet, and then one codeword per literal. Bits are packed LSB-first,
//! codewords included, and each block is padded to a byte boundary.

mod bits;
mod block;
mod huffman;

pub use bits::{BitReader, BitWriter};
pub use block::{
    decode_block, encode_block, ShortcutDescriptor, CODE_LENGTH_SYMBOLS, LITERAL_SYMBOLS,
    LITERAL_TABLE_SIZE, MAX_BLOCK_LITERALS, TABLE_MARKER,
};
pub use huffman::{adaptive_depths, uniform_depths, HuffmanTable, MAX_DEPTH, MIN_DEPTH};

use crate::error::{MpkError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the encoder assigns code depths to literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralDepths {
    /// Every byte value at depth 8
    #[default]
    Uniform,
    /// Narrowest single depth covering each block's largest byte
    Adaptive,
}

/// Bytes as they are stored on disk after the keep-smaller decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredData {
    /// Block-codec stream
    Packed(Vec<u8>),
    /// Original bytes
    Raw(Vec<u8>),
}

impl StoredData {
    pub fn is_packed(&self) -> bool {
        matches!(self, StoredData::Packed(_))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            StoredData::Packed(bytes) | StoredData::Raw(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

/// Encode `data` with uniform depth-8 literals
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    encode_with(data, LiteralDepths::Uniform)
}

/// Encode `data` as a sequence of blocks of at most [`MAX_BLOCK_LITERALS`]
pub fn encode_with(data: &[u8], mode: LiteralDepths) -> Result<Vec<u8>> {
    let uniform = uniform_depths();
    let mut writer = BitWriter::with_capacity(data.len() + data.len() / 8 + 64);

    for chunk in data.chunks(MAX_BLOCK_LITERALS) {
        match mode {
            LiteralDepths::Uniform => encode_block(&mut writer, chunk, &uniform)?,
            LiteralDepths::Adaptive => encode_block(&mut writer, chunk, &adaptive_depths(chunk))?,
        }
    }

    Ok(writer.finish())
}

/// Decode blocks until `target_len` bytes have been produced
pub fn decode(data: &[u8], target_len: usize) -> Result<Vec<u8>> {
    // Every literal costs at least MIN_DEPTH bits
    let mut out = Vec::with_capacity(target_len.min(data.len().saturating_mul(4)));
    let mut reader = BitReader::new(data);
    let mut blocks = 0usize;

    while out.len() < target_len {
        let budget = target_len - out.len();
        decode_block(&mut reader, &mut out, budget).map_err(|e| match e {
            MpkError::CorruptStream(msg) => MpkError::CorruptStream(format!(
                "block {} near byte {}: {}",
                blocks,
                reader.byte_position(),
                msg
            )),
            other => other,
        })?;
        blocks += 1;
    }

    debug!(blocks, bytes = out.len(), "decoded block stream");
    Ok(out)
}

/// Encode `data` and keep the result only if it is strictly smaller
///
/// A failed encode is logged and treated like one that did not shrink.
pub fn compress_if_smaller(data: &[u8], mode: LiteralDepths) -> StoredData {
    match encode_with(data, mode) {
        Ok(packed) if packed.len() < data.len() => StoredData::Packed(packed),
        Ok(packed) => {
            debug!(raw = data.len(), packed = packed.len(), "compression did not shrink data");
            StoredData::Raw(data.to_vec())
        }
        Err(e) => {
            tracing::warn!(error = %e, "compression failed, storing raw");
            StoredData::Raw(data.to_vec())
        }
    }
}
