//! Resumable acquisition pipeline.
//!
//! Crawls a year's page-ID range one page at a time, in increasing order:
//! dedup against the log, fetch, extract, save, append a log line. Transport
//! and extraction failures skip the page; an operator interrupt or an
//! unclassified error checkpoints the in-flight ID so the next run
//! re-attempts exactly that page.

pub mod log;
pub mod progress;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::ProgressBar;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CorpusConfig;
use crate::extract::extract_page;
use crate::fetch::PageFetcher;
use crate::store;

pub use log::{AcquisitionLog, LogEntry, LogError};
pub use progress::{ProgressError, ProgressStore, YearProgress};

/// Counters for one acquisition run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents saved and logged.
    pub saved: u64,
    /// Pages skipped because their address was already in the log.
    pub duplicates: u64,
    /// Pages skipped after a recoverable fetch or extraction failure.
    pub failed: u64,
}

/// Terminal state of an acquisition run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeRun {
    /// The whole ID range was processed; the cursor now points at `end`.
    Completed(RunSummary),
    /// The operator requested a stop; `checkpoint` is the ID written back
    /// into the progress file, to be re-attempted on the next run.
    Interrupted {
        /// Counters up to the interruption point.
        summary: RunSummary,
        /// The in-flight ID persisted as `continue_from`.
        checkpoint: u64,
    },
    /// The progress file has no settings for the requested year. Not an
    /// error: the operator gets a message listing the configured years.
    NoSettings {
        /// The requested year.
        year: String,
        /// Years that do have settings.
        available: Vec<String>,
    },
}

/// Errors that terminate an acquisition run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The year argument is not a parseable integer year.
    #[error("invalid year argument: {year}")]
    InvalidYear {
        /// The offending argument.
        year: String,
    },

    /// Progress file could not be read or written.
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Acquisition log could not be read or appended.
    #[error(transparent)]
    Log(#[from] LogError),

    /// An unclassified error hit while processing one page. The cause is
    /// unknown, so the in-flight ID was checkpointed and the run stopped;
    /// retry-from-same-point is the safe default.
    #[error("stopped at page {id} after checkpointing: {source}")]
    Stopped {
        /// The in-flight page ID, persisted as `continue_from`.
        id: u64,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// The acquisition loop over one year's ID range.
pub struct Scraper<'a> {
    config: &'a CorpusConfig,
    fetcher: &'a dyn PageFetcher,
    interrupted: Arc<AtomicBool>,
}

impl<'a> Scraper<'a> {
    /// Creates a loop bound to a config, a page fetcher, and the cooperative
    /// interrupt flag (set by the Ctrl-C watcher, checked between pages).
    pub fn new(
        config: &'a CorpusConfig,
        fetcher: &'a dyn PageFetcher,
        interrupted: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            fetcher,
            interrupted,
        }
    }

    /// Crawls the configured ID range for `year`.
    ///
    /// Re-running over the same range never duplicates work: pages are
    /// deduplicated on their canonical address, and the cursor only moves
    /// past IDs whose processing finished.
    pub async fn run_year(
        &self,
        year: &str,
        spinner: Option<&ProgressBar>,
    ) -> Result<ScrapeRun, ScrapeError> {
        let target_year: i32 = year.parse().map_err(|_| ScrapeError::InvalidYear {
            year: year.to_string(),
        })?;

        let mut progress = ProgressStore::load(&self.config.progress_path)?;
        let Some(range) = progress.get(year) else {
            return Ok(ScrapeRun::NoSettings {
                year: year.to_string(),
                available: progress.years(),
            });
        };

        let mut log = AcquisitionLog::open(&self.config.log_path())?;
        let mut summary = RunSummary::default();

        info!(
            year,
            from = range.continue_from,
            to = range.end,
            known_documents = log.len(),
            "starting acquisition run"
        );

        for id in range.continue_from..range.end {
            if self.interrupted.load(Ordering::SeqCst) {
                checkpoint(&mut progress, year, id)?;
                info!(year, checkpoint = id, "interrupted; progress file updated");
                return Ok(ScrapeRun::Interrupted {
                    summary,
                    checkpoint: id,
                });
            }

            let url = self.config.page_url(id);
            if let Some(spinner) = spinner {
                spinner.set_message(format!("[{id}] {} saved, {url}", summary.saved));
            }

            if log.contains(&url) {
                debug!(%url, "already in corpus");
                summary.duplicates += 1;
                continue;
            }

            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(%url, error = %e, "fetch failed, skipping page");
                    summary.failed += 1;
                    continue;
                }
            };

            let content = match extract_page(&html, target_year) {
                Ok(content) => content,
                Err(e) => {
                    debug!(%url, reason = %e, "nothing extracted, skipping page");
                    summary.failed += 1;
                    continue;
                }
            };

            let file_name = format!("{}.txt", log.next_file_num());
            let document_path = self
                .config
                .corpus_root
                .join(year)
                .join(&content.category)
                .join(&file_name);

            if let Err(e) = store::save_text(&document_path, &content.text) {
                checkpoint(&mut progress, year, id)?;
                return Err(ScrapeError::Stopped {
                    id,
                    source: Box::new(e),
                });
            }

            let entry = LogEntry {
                file_name: file_name.clone(),
                url: url.clone(),
                category: content.category,
                year: year.to_string(),
            };
            if let Err(e) = log.append(&entry) {
                checkpoint(&mut progress, year, id)?;
                return Err(ScrapeError::Stopped {
                    id,
                    source: Box::new(e),
                });
            }

            summary.saved += 1;
            info!(%url, file = %file_name, category = %entry.category, "saved document");
        }

        checkpoint(&mut progress, year, range.end)?;
        info!(
            year,
            saved = summary.saved,
            duplicates = summary.duplicates,
            failed = summary.failed,
            "acquisition run complete"
        );
        Ok(ScrapeRun::Completed(summary))
    }
}

/// Writes the cursor back and flushes the progress file synchronously.
fn checkpoint(progress: &mut ProgressStore, year: &str, id: u64) -> Result<(), ProgressError> {
    progress.set_continue_from(year, id);
    progress.save()
}
