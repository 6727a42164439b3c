//! Diachronic balancing algorithm.
//!
//! For every category present under both configured years, computes the two
//! year totals, takes the smaller as the target, and selects a greedy prefix
//! of the larger pool that just reaches it. The donor-limited year (the one
//! with the smaller total) contributes its whole pool unmodified. Selection
//! order is the deterministic listing order of [`crate::store::list_dir`],
//! so same-order re-runs reproduce the same subsets.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::CorpusConfig;
use crate::store::{self, StoreError};
use crate::wordcount::{self, WordCountError};

/// Errors that abort a balancing run. All are fatal: a compile run never
/// emits partial output for a category.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// A pool ran out of documents before reaching its category target.
    #[error(
        "not enough words for {category}/{year}: target is {target} words, \
         but only {found} were found in the pool"
    )]
    InsufficientWords {
        /// The category that fell short.
        category: String,
        /// The year whose pool was exhausted.
        year: String,
        /// The word-count target for the category.
        target: u64,
        /// Words actually found in the pool.
        found: u64,
    },

    /// A per-document word count failed (empty file, unreadable file).
    #[error(transparent)]
    WordCount(#[from] WordCountError),

    /// Enumerating the corpus layout failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One document pool entry: path plus its word count.
pub type PoolEntry = (PathBuf, u64);

/// The documents chosen for one (category, year) pair, in selection order,
/// with the cumulative word count they reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelection {
    /// The year this selection belongs to.
    pub year: String,
    /// Selected document paths, in deterministic listing order.
    pub files: Vec<PathBuf>,
    /// Cumulative word count of the selected documents.
    pub words: u64,
}

/// Balanced selections for one category across both years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPlan {
    /// The category name (corpus folder name).
    pub category: String,
    /// The word-count target: the smaller of the two year totals.
    pub target: u64,
    /// Per-year selections, in config year order.
    pub years: [YearSelection; 2],
}

/// The full balancing plan for a compile run.
#[derive(Debug, Clone, Default)]
pub struct BalancePlan {
    /// Per-category plans, in sorted category order.
    pub categories: Vec<CategoryPlan>,
}

/// Categories present under both years, minus the configured exclusions,
/// in sorted order.
pub fn common_categories(config: &CorpusConfig) -> Result<Vec<String>, BalanceError> {
    let mut per_year: Vec<BTreeSet<String>> = Vec::new();
    for year in &config.years {
        let listing = store::list_dir(&config.corpus_root.join(year))?;
        per_year.push(
            listing
                .folders
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
                .collect(),
        );
    }

    let [first, second] = per_year.as_slice() else {
        return Ok(Vec::new());
    };
    Ok(first
        .intersection(second)
        .filter(|category| !config.excluded_categories.contains(*category))
        .cloned()
        .collect())
}

/// The document pool for one (category, year): files in deterministic
/// listing order, each with its word count. An empty file in the pool is a
/// fatal data-integrity error.
pub fn category_pool(
    config: &CorpusConfig,
    year: &str,
    category: &str,
) -> Result<Vec<PoolEntry>, BalanceError> {
    let listing = store::list_dir(&config.corpus_root.join(year).join(category))?;
    let mut pool = Vec::with_capacity(listing.files.len());
    for file in listing.files {
        let words = wordcount::file_word_count(&file)? as u64;
        pool.push((file, words));
    }
    Ok(pool)
}

/// Greedy prefix selection: walks the pool in order, accumulating word
/// counts, and stops as soon as the running total reaches `target`. The
/// final document may overshoot; there is no trimming. Exhausting the pool
/// short of the target fails with [`BalanceError::InsufficientWords`].
pub fn select_prefix(
    category: &str,
    year: &str,
    pool: &[PoolEntry],
    target: u64,
) -> Result<YearSelection, BalanceError> {
    let mut files = Vec::new();
    let mut words = 0u64;

    for (path, count) in pool {
        files.push(path.clone());
        words += count;
        if words >= target {
            return Ok(YearSelection {
                year: year.to_string(),
                files,
                words,
            });
        }
    }

    Err(BalanceError::InsufficientWords {
        category: category.to_string(),
        year: year.to_string(),
        target,
        found: words,
    })
}

/// Computes the full balancing plan: per-category targets and per-year
/// selections, without writing anything.
pub fn plan(config: &CorpusConfig) -> Result<BalancePlan, BalanceError> {
    let categories = common_categories(config)?;
    info!(
        categories = categories.len(),
        "categories present under both years"
    );

    let mut plans = Vec::with_capacity(categories.len());
    for category in categories {
        let pools: Vec<Vec<PoolEntry>> = config
            .years
            .iter()
            .map(|year| category_pool(config, year, &category))
            .collect::<Result<_, _>>()?;

        let totals: Vec<u64> = pools
            .iter()
            .map(|pool| pool.iter().map(|(_, words)| words).sum())
            .collect();
        let target = totals.iter().copied().min().unwrap_or(0);
        debug!(
            category = %category,
            first = totals[0],
            second = totals[1],
            target,
            "category word totals"
        );

        let select_for = |idx: usize| -> Result<YearSelection, BalanceError> {
            let year = &config.years[idx];
            let pool = &pools[idx];
            // The donor-limited year contributes its whole pool unmodified.
            if totals[idx] == target {
                Ok(YearSelection {
                    year: year.clone(),
                    files: pool.iter().map(|(path, _)| path.clone()).collect(),
                    words: totals[idx],
                })
            } else {
                select_prefix(&category, year, pool, target)
            }
        };
        let years = [select_for(0)?, select_for(1)?];
        plans.push(CategoryPlan {
            category,
            target,
            years,
        });
    }

    Ok(BalancePlan { categories: plans })
}
