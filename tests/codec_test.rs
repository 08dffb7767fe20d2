//! Block codec behaviour on realistic buffers

use mpk_rs::codec::{
    adaptive_depths, decode, encode, encode_with, BitReader, HuffmanTable, LiteralDepths,
    MAX_BLOCK_LITERALS,
};
use mpk_rs::{compress_if_smaller, MpkError, StoredData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MODES: [LiteralDepths; 2] = [LiteralDepths::Uniform, LiteralDepths::Adaptive];

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf[..]);
    buf
}

/// Text-like data with a skewed byte distribution
fn skewed_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let alphabet = b"eeeeeetttaaoinshrdlu  \n";
    (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect()
}

#[test]
fn test_random_buffers_roundtrip() {
    let sizes = [0, 1, 2, 255, MAX_BLOCK_LITERALS, MAX_BLOCK_LITERALS + 1, 100_003];
    for (seed, &len) in sizes.iter().enumerate() {
        let data = random_bytes(len, seed as u64);
        for mode in MODES {
            let encoded = encode_with(&data, mode).unwrap();
            let decoded = decode(&encoded, data.len()).unwrap();
            assert_eq!(decoded, data, "len {} mode {:?}", len, mode);
        }
    }
}

#[test]
fn test_skewed_buffers_roundtrip_and_shrink() {
    for len in [64, 4096, 3 * MAX_BLOCK_LITERALS + 17] {
        let data = skewed_bytes(len, len as u64);
        let encoded = encode_with(&data, LiteralDepths::Adaptive).unwrap();
        assert_eq!(decode(&encoded, data.len()).unwrap(), data);
        if len >= 4096 {
            assert!(encoded.len() < data.len(), "len {} packed to {}", len, encoded.len());
        }
    }
}

/// Uniform-depth packer written out field by field: literal count as two
/// little-endian bytes, LSB-first fields, every literal as its own 8-bit
/// value, and a flush after each block
fn longhand_pack(input: &[u8]) -> Vec<u8> {
    struct Bits {
        out: Vec<u8>,
        buffer: u32,
        count: u32,
    }

    impl Bits {
        fn write(&mut self, value: u32, bits: u32) {
            self.buffer |= value << self.count;
            self.count += bits;
            while self.count >= 8 {
                self.out.push((self.buffer & 0xFF) as u8);
                self.buffer >>= 8;
                self.count -= 8;
            }
        }

        fn flush(&mut self) {
            if self.count > 0 {
                self.out.push((self.buffer & 0xFF) as u8);
                self.buffer = 0;
                self.count = 0;
            }
        }
    }

    let mut bits = Bits {
        out: Vec::new(),
        buffer: 0,
        count: 0,
    };
    for block in input.chunks(0x8000) {
        bits.out.extend_from_slice(&(block.len() as u16).to_le_bytes());
        bits.write(1, 5);
        bits.write(0, 5);
        bits.write(0, 2);
        bits.write(9, 9);
        for _ in 0..256 {
            bits.write(8 - 2, 4);
        }
        for _ in 256..0x1FE {
            bits.write(0, 4);
        }
        for &byte in block {
            bits.write(u32::from(byte), 8);
        }
        bits.flush();
    }
    bits.out
}

#[test]
fn test_uniform_stream_matches_longhand_packer() {
    let inputs = [
        Vec::new(),
        vec![0x41],
        b"hello".to_vec(),
        random_bytes(MAX_BLOCK_LITERALS, 21),
        random_bytes(MAX_BLOCK_LITERALS + 1, 22),
        random_bytes(2 * MAX_BLOCK_LITERALS + 7, 23),
    ];
    for data in inputs {
        let expected = longhand_pack(&data);
        assert_eq!(encode(&data).unwrap(), expected, "len {}", data.len());
        assert_eq!(decode(&expected, data.len()).unwrap(), data, "len {}", data.len());
    }
}

#[test]
fn test_hello_stream_bytes() {
    let stream = encode(b"hello").unwrap();
    assert_eq!(stream.len(), 265);
    // Literal count, then 1 in the 5-bit code-length count
    assert_eq!(&stream[..3], &[5, 0, 1]);
    // 16 + 5 + 5 + 2 + 9 + 0x1FE * 4 = 2077 bits: "hello" starts at bit 5 of byte 259
    let mut tail = [0u8; 8];
    tail[..6].copy_from_slice(&stream[259..265]);
    let literals = (u64::from_le_bytes(tail) >> 5) & 0xFF_FFFF_FFFF;
    assert_eq!(literals, u64::from_le_bytes(*b"hello\0\0\0"));
}

#[test]
fn test_uniform_codewords_equal_byte_values() {
    let data = b"MPK";
    let encoded = encode(data).unwrap();

    // 16 + 5 + 5 + 2 + 9 + 0x1FE * 4 header bits before the first codeword
    let mut reader = BitReader::new(&encoded);
    for width in [16, 5, 5, 2, 9] {
        reader.read_bits(width).unwrap();
    }
    for _ in 0..0x1FE {
        reader.read_bits(4).unwrap();
    }
    for &byte in data {
        assert_eq!(reader.read_bits(8).unwrap(), u32::from(byte));
    }
}

#[test]
fn test_uniform_falls_back_to_raw() {
    for data in [vec![0u8; 5000], random_bytes(5000, 7), b"hello".to_vec()] {
        assert_eq!(
            compress_if_smaller(&data, LiteralDepths::Uniform),
            StoredData::Raw(data.clone())
        );
    }
}

#[test]
fn test_random_data_stays_raw_in_adaptive_mode() {
    let data = random_bytes(20_000, 99);
    assert!(!compress_if_smaller(&data, LiteralDepths::Adaptive).is_packed());
}

#[test]
fn test_block_count_matches_size() {
    // Every block but the last holds exactly MAX_BLOCK_LITERALS literals
    let data = vec![0x55u8; 2 * MAX_BLOCK_LITERALS + 1];
    let encoded = encode(&data).unwrap();
    let mut reader = BitReader::new(&encoded);
    assert_eq!(reader.read_bits(16).unwrap() as usize, MAX_BLOCK_LITERALS);
    assert_eq!(decode(&encoded, data.len()).unwrap(), data);
}

#[test]
fn test_adaptive_depths_cover_largest_byte() {
    let data = skewed_bytes(10_000, 3);
    let depths = adaptive_depths(&data);
    // 'u' is the largest byte of the alphabet
    assert_eq!(depths, vec![7u8; usize::from(b'u') + 1]);

    let table = HuffmanTable::from_depths(&depths).unwrap();
    for symbol in 0..depths.len() {
        assert_eq!(table.code(symbol), Some((symbol as u32, 7)));
    }
}

#[test]
fn test_adaptive_zero_block_size() {
    let encoded = encode_with(&[0u8; 4000], LiteralDepths::Adaptive).unwrap();
    // 2077 table bits plus three bits per byte
    assert_eq!(encoded.len(), (2077 + 3 * 4000 + 7) / 8);
}

#[test]
fn test_decode_target_mismatch() {
    let data = skewed_bytes(1000, 11);
    let encoded = encode_with(&data, LiteralDepths::Adaptive).unwrap();

    // Asking for fewer bytes than the block holds is an overrun
    assert!(matches!(decode(&encoded, 999), Err(MpkError::CorruptStream(_))));
    // Asking for more runs off the end of the stream
    assert!(matches!(decode(&encoded, 1001), Err(MpkError::CorruptStream(_))));
}

#[test]
fn test_garbage_input_never_panics() {
    for seed in 0..200u64 {
        let garbage = random_bytes(64 + (seed as usize % 512), 1000 + seed);
        let _ = decode(&garbage, 4096);
    }
}
