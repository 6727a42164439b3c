//! Flat filesystem collaborators: save, append, and enumerate corpus files.
//!
//! Enumeration is non-recursive and deterministic: files sort by numeric
//! filename stem (lexicographic fallback), folders sort lexicographically.
//! Document filenames are allocated integers, so numeric-stem order equals
//! acquisition order and keeps downstream selection reproducible.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from filesystem primitives, always carrying the offending path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a file or directory failed.
    #[error("IO error reading {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("IO error writing {path}: {source}")]
    Write {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Immediate entries of one folder, split into files and subfolders.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    /// Plain files, sorted by numeric filename stem then lexicographically.
    pub files: Vec<PathBuf>,
    /// Subfolders, sorted lexicographically by name.
    pub folders: Vec<PathBuf>,
}

/// Lists the immediate files and subfolders of `path` (non-recursive).
pub fn list_dir(path: &Path) -> Result<DirListing, StoreError> {
    let mut listing = DirListing::default();

    let entries = fs::read_dir(path).map_err(|e| StoreError::read(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::read(path, e))?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| StoreError::read(&entry_path, e))?;
        if file_type.is_dir() {
            listing.folders.push(entry_path);
        } else if file_type.is_file() {
            listing.files.push(entry_path);
        }
    }

    listing.files.sort_by(|a, b| match (numeric_stem(a), numeric_stem(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.file_name().cmp(&b.file_name()),
    });
    listing.folders.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(listing)
}

/// Parses the filename stem as an integer, e.g. `42.txt` -> `Some(42)`.
fn numeric_stem(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Reads a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| StoreError::read(path, e))
}

/// Writes `text` to `path`, creating parent directories as needed.
pub fn save_text(path: &Path, text: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
    }
    fs::write(path, text).map_err(|e| StoreError::write(path, e))
}

/// Appends `line` plus a newline to `path`, creating the file if absent.
pub fn append_line(path: &Path, line: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::write(path, e))?;
    writeln!(file, "{line}").map_err(|e| StoreError::write(path, e))?;
    file.flush().map_err(|e| StoreError::write(path, e))
}
