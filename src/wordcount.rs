//! Word counting and tokenization over unicode word boundaries.
//!
//! Counting a zero-length input is a hard error: an empty document in the
//! corpus is a data-integrity violation, not a zero-word text.

use std::path::{Path, PathBuf};

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Errors from word counting.
#[derive(Debug, Error)]
pub enum WordCountError {
    /// The input text was zero-length.
    #[error("refusing to count words of an empty text")]
    EmptyInput,

    /// The file at `path` was zero-length.
    #[error("refusing to count words of empty file {path}")]
    EmptyFile {
        /// The empty file.
        path: PathBuf,
    },

    /// Reading the file failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Splits `text` into word tokens on unicode word boundaries.
///
/// Punctuation and whitespace are dropped; each CJK ideograph counts as its
/// own token, which keeps year-to-year comparisons consistent even though it
/// is coarser than morphological segmentation.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    text.unicode_words().collect()
}

/// Counts word tokens in `text`.
///
/// A zero-length input fails with [`WordCountError::EmptyInput`]; text that
/// contains only punctuation or whitespace counts as zero words.
pub fn count_words(text: &str) -> Result<usize, WordCountError> {
    if text.is_empty() {
        return Err(WordCountError::EmptyInput);
    }
    Ok(text.unicode_words().count())
}

/// Counts word tokens in the file at `path`.
///
/// A zero-length file fails with [`WordCountError::EmptyFile`] naming the
/// path, never a silent zero.
pub fn file_word_count(path: &Path) -> Result<usize, WordCountError> {
    let text = std::fs::read_to_string(path).map_err(|source| WordCountError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match count_words(&text) {
        Ok(count) => Ok(count),
        Err(WordCountError::EmptyInput) => Err(WordCountError::EmptyFile {
            path: path.to_path_buf(),
        }),
        Err(other) => Err(other),
    }
}
