//! CLI entry point for the corpus toolkit.

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use oshiete_corpus::{
    CorpusConfig, HttpFetcher, ScrapeRun, Scraper, compile, stats,
};
use tracing::{debug, info, warn};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?cli, "CLI arguments parsed");

    let config = CorpusConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Scrape { year } => run_scrape(&config, &year, cli.quiet).await,
        Command::Compile => run_compile(&config),
        Command::Stats => run_stats(&config),
    }
}

async fn run_scrape(config: &CorpusConfig, year: &str, quiet: bool) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_signal = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
        }
    });

    let spinner = (!quiet && io::stderr().is_terminal()).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });

    let fetcher = HttpFetcher::new()?;
    let scraper = Scraper::new(config, &fetcher, interrupted);
    let run = scraper.run_year(year, spinner.as_ref()).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    match run? {
        ScrapeRun::Completed(summary) => {
            info!(
                saved = summary.saved,
                duplicates = summary.duplicates,
                failed = summary.failed,
                "scrape complete"
            );
        }
        ScrapeRun::Interrupted { summary, checkpoint } => {
            warn!(
                checkpoint,
                saved = summary.saved,
                "interrupted; progress file has been updated. Run again to resume."
            );
        }
        ScrapeRun::NoSettings { year, available } => {
            if available.is_empty() {
                println!(
                    "No settings information available for year {year}. \
                     Please add it to {}.",
                    config.progress_path.display()
                );
            } else {
                println!(
                    "No settings information available for year {year}. \
                     Please add settings information or choose from one of the \
                     following years: {}",
                    available.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn run_compile(config: &CorpusConfig) -> Result<()> {
    let report = compile::compile(config)?;

    for row in &report.rows {
        for (year, words) in config.years.iter().zip(row.words.iter()) {
            println!("{year}_{slug}.txt: {words} words", slug = row.slug);
        }
    }
    println!(
        "Word count info saved to {}.",
        report.summary_path.display()
    );
    Ok(())
}

fn run_stats(config: &CorpusConfig) -> Result<()> {
    let rendered = stats::corpus_stats(&config.corpus_root)?;
    print!("{rendered}");
    Ok(())
}
