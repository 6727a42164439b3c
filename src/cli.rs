//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Acquire and balance a diachronic Japanese corpus.
///
/// The toolkit crawls Q&A pages from oshiete.goo.ne.jp one year at a time,
/// files the extracted text by category, and compiles per-category corpus
/// files with approximately equal word counts for both configured years.
#[derive(Parser, Debug)]
#[command(name = "oshiete-corpus")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a JSON config file overriding the built-in defaults
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl Q&A pages for one year, resuming from the saved cursor
    Scrape {
        /// The year to scrape content from
        year: String,
    },
    /// Balance both years per category and write the corpus files
    Compile,
    /// Print the corpus folder tree with file and word counts
    Stats,
}
