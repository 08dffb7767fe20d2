use crate::codec::bits::{BitReader, BitWriter};
use crate::error::{MpkError, Result};

/// Shortest code the 4-bit depth field can express
pub const MIN_DEPTH: u8 = 2;

/// Longest code the 4-bit depth field can express
pub const MAX_DEPTH: u8 = 17;

/// Canonical Huffman code built from a per-symbol depth table
///
/// Symbols are ordered by ascending depth, then by symbol index; codes are
/// handed out in that order starting from zero, so any two parties holding
/// the same depth table derive the same codes. A depth of 0 marks a symbol
/// absent from the tree.
///
/// Codewords travel least significant bit first, like every other field of
/// the stream. With a single depth `D` this is plain `D`-bit indexing: the
/// codeword of a symbol is its index.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    depths: Vec<u8>,
    codes: Vec<u32>,
    /// Number of codes of each length
    counts: [u16; MAX_DEPTH as usize + 1],
    /// First canonical code of each length
    first: [u32; MAX_DEPTH as usize + 1],
    /// Symbols in canonical order
    sorted: Vec<u16>,
}

impl HuffmanTable {
    /// Build the canonical code for `depths`
    ///
    /// Fails if no symbol is present, a depth is out of range, or the
    /// lengths over-subscribe the code space. Incomplete codes are allowed.
    pub fn from_depths(depths: &[u8]) -> Result<Self> {
        let mut counts = [0u16; MAX_DEPTH as usize + 1];
        for (symbol, &depth) in depths.iter().enumerate() {
            if depth > MAX_DEPTH {
                return Err(MpkError::CorruptStream(format!(
                    "symbol {} has depth {} (max {})",
                    symbol, depth, MAX_DEPTH
                )));
            }
            if depth > 0 {
                counts[depth as usize] += 1;
            }
        }

        if counts.iter().all(|&c| c == 0) {
            return Err(MpkError::CorruptStream("empty code table".to_string()));
        }

        // Kraft check
        let mut left: i64 = 1;
        for &count in &counts[1..] {
            left <<= 1;
            left -= i64::from(count);
            if left < 0 {
                return Err(MpkError::CorruptStream(
                    "over-subscribed code table".to_string(),
                ));
            }
        }

        let mut next_code = [0u32; MAX_DEPTH as usize + 1];
        let mut code = 0u32;
        for bits in 1..=MAX_DEPTH as usize {
            code = (code + u32::from(counts[bits - 1])) << 1;
            next_code[bits] = code;
        }
        let first = next_code;

        let mut codes = vec![0u32; depths.len()];
        for (symbol, &depth) in depths.iter().enumerate() {
            if depth > 0 {
                codes[symbol] = next_code[depth as usize];
                next_code[depth as usize] += 1;
            }
        }

        let mut offsets = [0usize; MAX_DEPTH as usize + 2];
        for len in 1..=MAX_DEPTH as usize {
            offsets[len + 1] = offsets[len] + counts[len] as usize;
        }
        let total = offsets[MAX_DEPTH as usize + 1];
        let mut sorted = vec![0u16; total];
        for (symbol, &depth) in depths.iter().enumerate() {
            if depth > 0 {
                let slot = &mut offsets[depth as usize];
                sorted[*slot] = symbol as u16;
                *slot += 1;
            }
        }

        Ok(Self {
            depths: depths.to_vec(),
            codes,
            counts,
            first,
            sorted,
        })
    }

    /// Codeword and its length for `symbol`, or `None` if absent
    pub fn code(&self, symbol: usize) -> Option<(u32, u32)> {
        match self.depths.get(symbol) {
            Some(&depth) if depth > 0 => Some((self.codes[symbol], u32::from(depth))),
            _ => None,
        }
    }

    pub fn depths(&self) -> &[u8] {
        &self.depths
    }

    /// Emit the codeword for `symbol`
    pub fn write_symbol(&self, writer: &mut BitWriter, symbol: usize) -> Result<()> {
        let (code, len) = self.code(symbol).ok_or_else(|| {
            MpkError::CompressionFailed(format!("symbol {} has no code", symbol))
        })?;
        writer.write_bits(code, len);
        Ok(())
    }

    /// Read one codeword a bit at a time, lowest bit first
    ///
    /// After each bit the partial value is tested against the code range of
    /// that length, so the shortest matching codeword wins. Tables with a
    /// single depth, the only kind the encoder emits, are unambiguous.
    pub fn read_symbol(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut code = 0u32;
        let mut index = 0usize;

        for len in 1..=MAX_DEPTH as usize {
            code |= reader.read_bit()? << (len - 1);
            let count = u32::from(self.counts[len]);
            let first = self.first[len];
            if code >= first && code - first < count {
                return Ok(self.sorted[index + (code - first) as usize]);
            }
            index += count as usize;
        }

        Err(MpkError::CorruptStream(format!(
            "code does not terminate within {} bits",
            MAX_DEPTH
        )))
    }
}

/// Every byte value at depth 8: the code of each literal is its own value
pub fn uniform_depths() -> Vec<u8> {
    vec![8; 256]
}

/// Narrowest single depth that still gives a depth field a non-zero value
const NARROWEST_DEPTH: u8 = MIN_DEPTH + 1;

/// Depths sized to the largest byte of a block
///
/// Every symbol up to the largest byte present shares the narrowest depth
/// that indexes them all; symbols above it are left out of the table. Codes
/// stay equal to byte values, so ASCII text costs 7 bits per byte and a
/// block of zeros 3.
pub fn adaptive_depths(literals: &[u8]) -> Vec<u8> {
    let symbols = literals.iter().copied().max().map_or(1, |max| usize::from(max) + 1);
    let mut depth = NARROWEST_DEPTH;
    while (1usize << depth) < symbols {
        depth += 1;
    }
    vec![depth; symbols]
}
