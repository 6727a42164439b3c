//! Persistent resumption cursor for the acquisition loop.
//!
//! The progress file is JSON keyed by year string, each entry holding the
//! next page ID to attempt and the exclusive upper bound of the crawl range.
//! Only the acquisition loop mutates it, and every terminal or interrupted
//! step flushes it synchronously before the process exits.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crawl range state for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearProgress {
    /// Next page ID to attempt on resumption.
    pub continue_from: u64,
    /// Exclusive upper bound of the ID range.
    pub end: u64,
}

/// Errors reading or writing the progress file.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Reading or writing the file failed.
    #[error("IO error on progress file {path}: {source}")]
    Io {
        /// The progress file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid progress JSON.
    #[error("malformed progress file {path}: {source}")]
    Malformed {
        /// The progress file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// The progress store: an in-memory copy of the progress file.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    entries: BTreeMap<String, YearProgress>,
}

impl ProgressStore {
    /// Loads the progress file. A missing file yields an empty store; the
    /// caller decides whether that is worth telling the operator about.
    pub fn load(path: &Path) -> Result<Self, ProgressError> {
        let entries = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ProgressError::Malformed {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(ProgressError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Crawl range for a year, if configured.
    #[must_use]
    pub fn get(&self, year: &str) -> Option<YearProgress> {
        self.entries.get(year).copied()
    }

    /// Years present in the store, in sorted order.
    #[must_use]
    pub fn years(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Inserts or replaces the range for a year.
    pub fn set(&mut self, year: &str, progress: YearProgress) {
        self.entries.insert(year.to_string(), progress);
    }

    /// Moves a year's cursor. No-op when the year is absent.
    pub fn set_continue_from(&mut self, year: &str, id: u64) {
        if let Some(entry) = self.entries.get_mut(year) {
            entry.continue_from = id;
        }
    }

    /// Writes the store back to disk and syncs it to stable storage, so an
    /// interrupted crawl can always resume from the recorded cursor.
    pub fn save(&self) -> Result<(), ProgressError> {
        let io_err = |source| ProgressError::Io {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            ProgressError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut file = File::create(&self.path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)
    }
}
