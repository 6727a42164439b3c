//! Corpus assembly: turn a balancing plan into per-category corpus files.
//!
//! For each (category, year) selection, concatenates the selected documents
//! in selection order, each wrapped with a delimiter line carrying its
//! originating path, and writes a raw and a tokenized rendition plus a
//! summary table of per-category word counts.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::balance::{self, BalanceError, YearSelection};
use crate::config::CorpusConfig;
use crate::store::{self, StoreError};
use crate::wordcount;

/// Errors that abort a compile run. No partial corpus file is valid output:
/// the balancing plan and the translation check both run before any write.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A common category has no configured ASCII slug.
    #[error("no translation configured for category {category}")]
    MissingTranslation {
        /// The untranslatable category.
        category: String,
    },

    /// Balancing failed (insufficient words, empty file, unreadable layout).
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Writing an output file failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Summary row for one compiled category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// The category name.
    pub category: String,
    /// The ASCII slug used in output filenames.
    pub slug: String,
    /// Word counts of the selected documents, in config year order.
    pub words: [u64; 2],
}

/// The result of a compile run.
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// One row per compiled category, in sorted category order.
    pub rows: Vec<CategorySummary>,
    /// Aggregate word counts across categories, in config year order.
    pub totals: [u64; 2],
    /// Path of the written summary table.
    pub summary_path: PathBuf,
}

/// Balances and compiles the corpus, writing raw and tokenized per-category
/// files plus the `word_counts.csv` summary under the output directory.
pub fn compile(config: &CorpusConfig) -> Result<CompileReport, CompileError> {
    let plan = balance::plan(config)?;

    // Fail on a missing translation before the first write.
    for category_plan in &plan.categories {
        if config.slug_for(&category_plan.category).is_none() {
            return Err(CompileError::MissingTranslation {
                category: category_plan.category.clone(),
            });
        }
    }

    let output_dir = config.output_dir();
    let mut rows = Vec::with_capacity(plan.categories.len());
    let mut totals = [0u64; 2];

    for category_plan in &plan.categories {
        let slug = config
            .slug_for(&category_plan.category)
            .unwrap_or_default()
            .to_string();

        let mut words = [0u64; 2];
        for (idx, selection) in category_plan.years.iter().enumerate() {
            write_selection(&output_dir, &slug, selection)?;
            words[idx] = selection.words;
            totals[idx] += selection.words;
            info!(
                category = %category_plan.category,
                year = %selection.year,
                files = selection.files.len(),
                words = selection.words,
                "compiled corpus files"
            );
        }

        rows.push(CategorySummary {
            category: category_plan.category.clone(),
            slug,
            words,
        });
    }

    let summary_path = write_summary(&output_dir, config, &rows, totals)?;
    Ok(CompileReport {
        rows,
        totals,
        summary_path,
    })
}

/// Writes the raw and tokenized renditions for one (category, year)
/// selection.
fn write_selection(
    output_dir: &Path,
    slug: &str,
    selection: &YearSelection,
) -> Result<(), CompileError> {
    let raw = concatenate(&selection.files)?;
    let raw_path = output_dir.join(format!("{}_{}.txt", selection.year, slug));
    store::save_text(&raw_path, &raw)?;

    let tokenized = wordcount::tokenize(&raw).join(" ");
    let tokenized_path = output_dir.join(format!("{}_{}_tokenized.txt", selection.year, slug));
    store::save_text(&tokenized_path, &tokenized)?;

    Ok(())
}

/// Concatenates documents in selection order, each preceded by a delimiter
/// line carrying its originating path.
fn concatenate(files: &[PathBuf]) -> Result<String, CompileError> {
    let mut out = String::new();
    for file in files {
        let text = store::read_text(file)?;
        out.push_str(&format!("===== {} =====\n", file.display()));
        out.push_str(text.trim_end());
        out.push_str("\n\n");
    }
    Ok(out)
}

/// Writes the summary table: one row per category with per-year word counts
/// of the selected documents, plus a final aggregate row.
fn write_summary(
    output_dir: &Path,
    config: &CorpusConfig,
    rows: &[CategorySummary],
    totals: [u64; 2],
) -> Result<PathBuf, CompileError> {
    let mut table = format!("category,slug,{},{}\n", config.years[0], config.years[1]);
    for row in rows {
        table.push_str(&format!(
            "{},{},{},{}\n",
            row.category, row.slug, row.words[0], row.words[1]
        ));
    }
    table.push_str(&format!("Total,,{},{}\n", totals[0], totals[1]));

    let path = output_dir.join("word_counts.csv");
    store::save_text(&path, &table)?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_doc(root: &Path, year: &str, category: &str, name: &str, words: usize) {
        let text = vec!["word"; words].join(" ");
        let path = root.join(year).join(category).join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    fn test_config(root: &Path) -> CorpusConfig {
        let mut config = CorpusConfig {
            corpus_root: root.join("corpus"),
            output_dir: Some(root.join("out")),
            ..CorpusConfig::default()
        };
        config
            .category_translations
            .insert("cat".to_string(), "cat-slug".to_string());
        config
    }

    fn seed_balanced_corpus(config: &CorpusConfig) {
        let root = &config.corpus_root;
        write_doc(root, "2001", "cat", "1.txt", 100);
        write_doc(root, "2021", "cat", "1.txt", 80);
        write_doc(root, "2021", "cat", "2.txt", 80);
    }

    #[test]
    fn test_compile_writes_raw_tokenized_and_summary() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        seed_balanced_corpus(&config);

        let report = compile(&config).unwrap();

        let out = config.output_dir();
        assert!(out.join("2001_cat-slug.txt").is_file());
        assert!(out.join("2001_cat-slug_tokenized.txt").is_file());
        assert!(out.join("2021_cat-slug.txt").is_file());
        assert!(out.join("2021_cat-slug_tokenized.txt").is_file());
        assert_eq!(report.summary_path, out.join("word_counts.csv"));
    }

    #[test]
    fn test_compile_raw_file_carries_document_delimiters() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        seed_balanced_corpus(&config);

        compile(&config).unwrap();

        let raw =
            std::fs::read_to_string(config.output_dir().join("2021_cat-slug.txt")).unwrap();
        assert!(raw.contains("===== "), "delimiter lines expected");
        assert!(
            raw.contains("1.txt") && raw.contains("2.txt"),
            "delimiters carry originating paths: {raw}"
        );
    }

    #[test]
    fn test_compile_summary_has_header_rows_and_total() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        seed_balanced_corpus(&config);

        let report = compile(&config).unwrap();

        let summary = std::fs::read_to_string(&report.summary_path).unwrap();
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines[0], "category,slug,2001,2021");
        assert_eq!(lines[1], "cat,cat-slug,100,160");
        assert_eq!(lines[2], "Total,,100,160");
    }

    #[test]
    fn test_compile_missing_translation_fails_before_writing() {
        let tmp = TempDir::new().unwrap();
        let mut config = test_config(tmp.path());
        config.category_translations.remove("cat");
        seed_balanced_corpus(&config);

        let err = compile(&config).unwrap_err();
        assert!(matches!(err, CompileError::MissingTranslation { .. }));
        assert!(
            !config.output_dir().join("word_counts.csv").exists(),
            "no partial output on failure"
        );
    }

    #[test]
    fn test_compile_tokenized_rendition_is_space_joined() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        seed_balanced_corpus(&config);

        compile(&config).unwrap();

        let tokenized =
            std::fs::read_to_string(config.output_dir().join("2001_cat-slug_tokenized.txt"))
                .unwrap();
        assert!(!tokenized.contains('\n'));
        assert!(tokenized.split(' ').count() > 100);
    }

    #[test]
    fn test_compile_empty_corpus_produces_empty_summary() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        std::fs::create_dir_all(config.corpus_root.join("2001")).unwrap();
        std::fs::create_dir_all(config.corpus_root.join("2021")).unwrap();

        let report = compile(&config).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.totals, [0, 0]);
    }
}
