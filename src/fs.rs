//! Filesystem access used by pack and unpack

use crate::error::{MpkError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The filesystem operations the archive engine needs
pub trait FileSystem: Send + Sync {
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn is_dir(&self, path: &Path) -> bool;

    /// Regular files under `root`, relative to it, in sorted order
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// [`FileSystem`] over `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| MpkError::file_io(path, e))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(path, data).map_err(|e| MpkError::file_io(path, e))
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| MpkError::file_io(path, e))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let read_dir = fs::read_dir(&dir).map_err(|e| MpkError::file_io(&dir, e))?;
            for item in read_dir {
                let item = item.map_err(|e| MpkError::file_io(&dir, e))?;
                let path = item.path();
                let file_type = item.file_type().map_err(|e| MpkError::file_io(&path, e))?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    let relative = path
                        .strip_prefix(root)
                        .map(Path::to_path_buf)
                        .unwrap_or(path);
                    files.push(relative);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Archive name for a file path relative to the pack root
pub fn entry_name_for(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(
                part.to_str()
                    .ok_or_else(|| MpkError::NameEncoding(relative.display().to_string()))?,
            ),
            Component::CurDir => {}
            _ => return Err(MpkError::UnsafePath(relative.display().to_string())),
        }
    }
    if parts.is_empty() {
        return Err(MpkError::UnsafePath(relative.display().to_string()));
    }
    Ok(parts.join("/"))
}

/// Destination of an entry below `root`
///
/// Both `/` and `\` separate components. Rooted names, drive prefixes and
/// `..` components are rejected so extraction never leaves `root`.
pub fn entry_output_path(root: &Path, name: &str) -> Result<PathBuf> {
    if name.starts_with(['/', '\\']) {
        return Err(MpkError::UnsafePath(name.to_string()));
    }

    let mut path = root.to_path_buf();
    let mut depth = 0usize;
    for part in name.split(['/', '\\']) {
        match part {
            "" | "." => continue,
            ".." => return Err(MpkError::UnsafePath(name.to_string())),
            _ if part.contains(':') => return Err(MpkError::UnsafePath(name.to_string())),
            _ => {
                path.push(part);
                depth += 1;
            }
        }
    }

    if depth == 0 {
        return Err(MpkError::UnsafePath(name.to_string()));
    }
    Ok(path)
}
