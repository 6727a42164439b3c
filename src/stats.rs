//! Corpus folder statistics.
//!
//! A folder is either a leaf (documents, no subfolders) or an interior node
//! (subfolders). File and word totals are pure recursive folds over that
//! variant; files sitting in interior folders are ignored.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store::{self, StoreError};
use crate::wordcount::{self, WordCountError};

/// Errors while scanning the corpus tree.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Enumerating a folder failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Counting words of a document failed (empty or unreadable file).
    #[error(transparent)]
    WordCount(#[from] WordCountError),
}

/// One folder in the corpus tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderNode {
    /// A folder holding documents and no subfolders.
    Leaf {
        /// Folder name.
        name: String,
        /// Number of documents directly inside.
        file_count: u64,
        /// Total words across those documents.
        word_count: u64,
    },
    /// A folder holding subfolders.
    Interior {
        /// Folder name.
        name: String,
        /// Child folders, in lexicographic order.
        children: Vec<FolderNode>,
    },
}

impl FolderNode {
    /// Scans `path` recursively into a folder tree, counting words in every
    /// leaf. An empty document anywhere in the tree is a fatal error.
    pub fn scan(path: &Path) -> Result<Self, StatsError> {
        let name = folder_name(path);
        let listing = store::list_dir(path)?;

        if listing.folders.is_empty() {
            let mut word_count = 0u64;
            for file in &listing.files {
                word_count += wordcount::file_word_count(file)? as u64;
            }
            return Ok(Self::Leaf {
                name,
                file_count: listing.files.len() as u64,
                word_count,
            });
        }

        let children = listing
            .folders
            .iter()
            .map(|folder| Self::scan(folder))
            .collect::<Result<_, _>>()?;
        Ok(Self::Interior { name, children })
    }

    /// Folder name of this node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { name, .. } | Self::Interior { name, .. } => name,
        }
    }

    /// Total documents under this node.
    #[must_use]
    pub fn file_count(&self) -> u64 {
        match self {
            Self::Leaf { file_count, .. } => *file_count,
            Self::Interior { children, .. } => children.iter().map(Self::file_count).sum(),
        }
    }

    /// Total words under this node.
    #[must_use]
    pub fn word_count(&self) -> u64 {
        match self {
            Self::Leaf { word_count, .. } => *word_count,
            Self::Interior { children, .. } => children.iter().map(Self::word_count).sum(),
        }
    }

    /// Renders the tree as indented lines, one folder per line with its
    /// aggregated file and word counts.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        out.push_str(&"\t".repeat(depth));
        out.push_str(&format!(
            "{}: {} files, {} words\n",
            self.name(),
            self.file_count(),
            self.word_count()
        ));
        if let Self::Interior { children, .. } = self {
            for child in children {
                child.render_into(out, depth + 1);
            }
        }
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Scans the corpus root and returns the rendered statistics tree.
pub fn corpus_stats(root: &Path) -> Result<String, StatsError> {
    let tree = FolderNode::scan(root)?;
    Ok(tree.render())
}
