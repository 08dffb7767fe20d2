//! Entry-name text codec
//!
//! Names in the index are stored in a fixed legacy single/double-byte code
//! page. The archive code only sees the [`NameCodec`] trait so a different
//! table can be injected.

use crate::error::{MpkError, Result};
use encoding_rs::SHIFT_JIS;

/// Byte <-> string conversion for entry names
pub trait NameCodec: Send + Sync {
    fn decode_name(&self, bytes: &[u8]) -> Result<String>;
    fn encode_name(&self, name: &str) -> Result<Vec<u8>>;
}

/// Shift_JIS, the code page used by shipped archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftJis;

impl NameCodec for ShiftJis {
    fn decode_name(&self, bytes: &[u8]) -> Result<String> {
        let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
        if had_errors {
            return Err(MpkError::NameEncoding(format!(
                "malformed name bytes {:02x?}",
                bytes
            )));
        }
        Ok(text.into_owned())
    }

    fn encode_name(&self, name: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_errors) = SHIFT_JIS.encode(name);
        if had_errors {
            return Err(MpkError::NameEncoding(name.to_string()));
        }
        Ok(bytes.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let codec = ShiftJis;
        assert_eq!(codec.encode_name("data/a.txt").unwrap(), b"data/a.txt");
        assert_eq!(codec.decode_name(b"data/a.txt").unwrap(), "data/a.txt");
    }

    #[test]
    fn test_double_byte_roundtrip() {
        let codec = ShiftJis;
        let name = "音声/効果音.ogg";
        let bytes = codec.encode_name(name).unwrap();
        assert!(bytes.len() > name.chars().count());
        assert_eq!(codec.decode_name(&bytes).unwrap(), name);
    }

    #[test]
    fn test_unmappable_name_rejected() {
        assert!(ShiftJis.encode_name("emoji_😀.png").is_err());
    }

    #[test]
    fn test_malformed_bytes_rejected() {
        // Lead byte with no trail byte
        assert!(ShiftJis.decode_name(&[0x82]).is_err());
    }
}
