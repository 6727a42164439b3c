//! Append-only acquisition log.
//!
//! One line per acquired document: `filename,url,category,year`. The log is
//! the durable set of already-acquired page addresses (the dedup key) and
//! the source of the next free local filename.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store;

/// One acquired document, as recorded in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local filename within the category folder, e.g. `17.txt`.
    pub file_name: String,
    /// Canonical page address the document came from.
    pub url: String,
    /// Category folder the document was filed under.
    pub category: String,
    /// Year the crawl targeted.
    pub year: String,
}

impl LogEntry {
    fn to_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.file_name, self.url, self.category, self.year
        )
    }

    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(4, ',');
        Some(Self {
            file_name: fields.next()?.to_string(),
            url: fields.next()?.to_string(),
            category: fields.next()?.to_string(),
            year: fields.next()?.to_string(),
        })
    }
}

/// Errors reading or appending the log.
#[derive(Debug, Error)]
pub enum LogError {
    /// A line did not carry the four expected fields. The log is exclusively
    /// owned by the pipeline, so this means on-disk corruption.
    #[error("malformed log line {line} in {path}")]
    Malformed {
        /// The log file path.
        path: PathBuf,
        /// 1-based line number of the bad line.
        line: usize,
    },

    /// Reading or writing the log file failed.
    #[error(transparent)]
    Store(#[from] store::StoreError),
}

/// In-memory view of the acquisition log, backed by the append-only file.
#[derive(Debug)]
pub struct AcquisitionLog {
    path: PathBuf,
    seen_urls: HashSet<String>,
    next_file_num: u64,
}

impl AcquisitionLog {
    /// Opens the log, creating a blank file when none exists yet.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        if !path.is_file() {
            store::save_text(path, "")?;
        }

        let text = store::read_text(path)?;
        let mut seen_urls = HashSet::new();
        let mut max_file_num = 0u64;

        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let entry = LogEntry::parse(line).ok_or(LogError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
            })?;
            if let Some(num) = file_num(&entry.file_name) {
                max_file_num = max_file_num.max(num);
            }
            seen_urls.insert(entry.url);
        }

        Ok(Self {
            path: path.to_path_buf(),
            seen_urls,
            next_file_num: max_file_num + 1,
        })
    }

    /// Whether a page address was already acquired in this or a prior run.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.seen_urls.contains(url)
    }

    /// Next free local filename number. The first document is 1.
    #[must_use]
    pub fn next_file_num(&self) -> u64 {
        self.next_file_num
    }

    /// Number of acquired documents known to this log view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen_urls.len()
    }

    /// Whether no document has been acquired yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen_urls.is_empty()
    }

    /// Appends an entry and advances the in-memory dedup set and filename
    /// counter.
    pub fn append(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        store::append_line(&self.path, &entry.to_line())?;
        self.seen_urls.insert(entry.url.clone());
        if let Some(num) = file_num(&entry.file_name) {
            self.next_file_num = self.next_file_num.max(num + 1);
        }
        Ok(())
    }
}

/// Numeric part of a local filename, e.g. `17.txt` -> `Some(17)`.
fn file_num(file_name: &str) -> Option<u64> {
    file_name.split('.').next()?.parse().ok()
}
