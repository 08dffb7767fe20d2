//! Pack settings, loadable from TOML
//!
//! ```toml
//! compress_files = true
//! compress_index = false
//! literal_depths = "adaptive"
//! ```

use crate::codec::LiteralDepths;
use crate::error::{MpkError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling how [`crate::pack`] stores files and the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackOptions {
    /// Try the block codec on every file, keeping it only if it shrinks the file
    pub compress_files: bool,
    /// Try the block codec on the index, keeping it only if it shrinks the index
    pub compress_index: bool,
    pub literal_depths: LiteralDepths,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            compress_files: true,
            compress_index: false,
            literal_depths: LiteralDepths::Uniform,
        }
    }
}

impl PackOptions {
    pub fn new(compress_files: bool, compress_index: bool) -> Self {
        Self {
            compress_files,
            compress_index,
            ..Self::default()
        }
    }

    pub fn with_literal_depths(mut self, literal_depths: LiteralDepths) -> Self {
        self.literal_depths = literal_depths;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load options from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MpkError::file_io(path, e))?;
        Self::from_toml_str(&text)
    }
}
