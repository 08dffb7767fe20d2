use crate::error::{MpkError, Result};

/// LSB-first bit accumulator
///
/// Values are appended starting at the lowest free bit. Whole bytes are
/// emitted as soon as eight bits are pending; a partial byte is only
/// written by [`BitWriter::align`] or [`BitWriter::finish`], zero-padded in
/// its high bits.
#[derive(Debug, Default)]
pub struct BitWriter {
    out: Vec<u8>,
    acc: u64,
    pending: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: Vec::with_capacity(bytes),
            acc: 0,
            pending: 0,
        }
    }

    /// Append the low `count` bits of `value` (count <= 32)
    pub fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        if count == 0 {
            return;
        }
        let mask = (1u64 << count) - 1;
        self.acc |= (u64::from(value) & mask) << self.pending;
        self.pending += count;

        while self.pending >= 8 {
            self.out.push((self.acc & 0xFF) as u8);
            self.acc >>= 8;
            self.pending -= 8;
        }
    }

    /// Number of bits written so far, including pending ones
    pub fn bit_len(&self) -> usize {
        self.out.len() * 8 + self.pending as usize
    }

    /// Emit any partial byte, zero-padded, so the next field starts on a byte
    pub fn align(&mut self) {
        if self.pending > 0 {
            self.out.push((self.acc & 0xFF) as u8);
            self.acc = 0;
            self.pending = 0;
        }
    }

    /// Flush the trailing partial byte and return the stream
    pub fn finish(mut self) -> Vec<u8> {
        self.align();
        self.out
    }
}

/// Reader matching [`BitWriter`]'s packing order
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    acc: u64,
    available: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            acc: 0,
            available: 0,
        }
    }

    fn refill(&mut self) {
        while self.available <= 56 && self.pos < self.data.len() {
            self.acc |= u64::from(self.data[self.pos]) << self.available;
            self.pos += 1;
            self.available += 8;
        }
    }

    /// Read `count` bits (count <= 32)
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        debug_assert!(count <= 32);
        if count == 0 {
            return Ok(0);
        }
        if self.available < count {
            self.refill();
            if self.available < count {
                return Err(MpkError::CorruptStream(format!(
                    "unexpected end of stream at byte {} (wanted {} bits, {} left)",
                    self.pos, count, self.available
                )));
            }
        }
        let value = (self.acc & ((1u64 << count) - 1)) as u32;
        self.acc >>= count;
        self.available -= count;
        Ok(value)
    }

    pub fn read_bit(&mut self) -> Result<u32> {
        self.read_bits(1)
    }

    /// Skip the padding bits left in the current byte
    pub fn align(&mut self) {
        let padding = self.available % 8;
        self.acc >>= padding;
        self.available -= padding;
    }

    /// Bits not yet consumed, including any zero padding in the last byte
    pub fn remaining_bits(&self) -> usize {
        (self.data.len() - self.pos) * 8 + self.available as usize
    }

    /// Byte position of the next unread bit
    pub fn byte_position(&self) -> usize {
        self.pos - (self.available as usize / 8)
    }
}
