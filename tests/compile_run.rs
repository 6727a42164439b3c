//! Integration tests for the balancing and compilation pipeline.

use std::path::Path;

use oshiete_corpus::{BalanceError, CompileError, CorpusConfig, WordCountError, balance, compile};
use tempfile::TempDir;

fn write_doc(root: &Path, year: &str, category: &str, name: &str, words: usize) {
    let text = vec!["語"; words].join(" ");
    let path = root.join(year).join(category).join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

fn test_config(tmp: &Path) -> CorpusConfig {
    let mut config = CorpusConfig {
        corpus_root: tmp.join("corpus"),
        output_dir: Some(tmp.join("out")),
        ..CorpusConfig::default()
    };
    config
        .category_translations
        .insert("科学".to_string(), "science".to_string());
    config
        .category_translations
        .insert("音楽".to_string(), "music".to_string());
    config
}

#[test]
fn test_compile_balances_each_category_to_the_smaller_year() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    let root = &config.corpus_root;

    // 科学: 2001 is donor-limited with 500 words; 2021 has 1200.
    write_doc(root, "2001", "科学", "1.txt", 500);
    for n in 1..=3 {
        write_doc(root, "2021", "科学", &format!("{n}.txt"), 400);
    }
    // 音楽: 2021 is donor-limited.
    write_doc(root, "2001", "音楽", "4.txt", 300);
    write_doc(root, "2001", "音楽", "5.txt", 300);
    write_doc(root, "2021", "音楽", "4.txt", 450);

    let report = compile::compile(&config).unwrap();

    assert_eq!(report.rows.len(), 2);
    let science = report.rows.iter().find(|r| r.slug == "science").unwrap();
    assert_eq!(science.words[0], 500, "donor year keeps its full pool");
    assert!(science.words[1] >= 500, "selection reaches the target");
    assert!(science.words[1] < 500 + 400, "overshoot bounded by one document");

    let music = report.rows.iter().find(|r| r.slug == "music").unwrap();
    assert_eq!(music.words[1], 450);
    assert!(music.words[0] >= 450 && music.words[0] <= 600);

    for name in [
        "2001_science.txt",
        "2001_science_tokenized.txt",
        "2021_science.txt",
        "2021_science_tokenized.txt",
        "2001_music.txt",
        "2021_music.txt",
        "word_counts.csv",
    ] {
        assert!(
            config.output_dir().join(name).is_file(),
            "missing output {name}"
        );
    }
}

#[test]
fn test_compile_summary_totals_aggregate_categories() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    let root = &config.corpus_root;

    write_doc(root, "2001", "科学", "1.txt", 100);
    write_doc(root, "2021", "科学", "1.txt", 100);
    write_doc(root, "2001", "音楽", "2.txt", 50);
    write_doc(root, "2021", "音楽", "2.txt", 70);

    let report = compile::compile(&config).unwrap();
    assert_eq!(report.totals, [150, 170]);

    let summary = std::fs::read_to_string(&report.summary_path).unwrap();
    let last = summary.lines().last().unwrap();
    assert_eq!(last, "Total,,150,170");
}

#[test]
fn test_selection_failure_names_category_and_shortfall() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    write_doc(&config.corpus_root, "2021", "科学", "1.txt", 120);

    let pool = balance::category_pool(&config, "2021", "科学").unwrap();
    let err = balance::select_prefix("科学", "2021", &pool, 1000).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("科学"), "category named in: {message}");
    assert!(message.contains("1000"), "target named in: {message}");
    assert!(message.contains("120"), "found words named in: {message}");
    assert!(
        !config.output_dir().exists(),
        "a failed selection writes nothing"
    );
}

#[test]
fn test_empty_document_aborts_compile_with_no_partial_output() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    let root = &config.corpus_root;

    write_doc(root, "2001", "科学", "1.txt", 100);
    write_doc(root, "2021", "科学", "1.txt", 100);
    std::fs::write(root.join("2021").join("科学").join("2.txt"), "").unwrap();

    let err = compile::compile(&config).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Balance(BalanceError::WordCount(WordCountError::EmptyFile { .. }))
    ));
    assert!(err.to_string().contains("2.txt"), "offending file named");
    assert!(
        !config.output_dir().exists(),
        "no partial corpus output after a fatal error"
    );
}

#[test]
fn test_excluded_categories_are_not_compiled() {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(tmp.path());
    config.excluded_categories.push("科学".to_string());
    let root = &config.corpus_root;

    write_doc(root, "2001", "科学", "1.txt", 100);
    write_doc(root, "2021", "科学", "1.txt", 100);
    write_doc(root, "2001", "音楽", "2.txt", 50);
    write_doc(root, "2021", "音楽", "2.txt", 50);

    let report = compile::compile(&config).unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].slug, "music");
    assert!(!config.output_dir().join("2001_science.txt").exists());
}
