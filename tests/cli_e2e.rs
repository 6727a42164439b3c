//! End-to-end CLI tests for the oshiete-corpus binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_config(tmp: &Path) -> std::path::PathBuf {
    let config = serde_json::json!({
        "corpus_root": tmp.join("corpus"),
        "output_dir": tmp.join("out"),
        "progress_path": tmp.join("progress.json"),
    });
    let path = tmp.join("config.json");
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

fn write_doc(root: &Path, year: &str, category: &str, name: &str, words: usize) {
    let text = vec!["語"; words].join(" ");
    let path = root.join(year).join(category).join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

fn corpus_cmd() -> Command {
    Command::cargo_bin("oshiete-corpus").unwrap()
}

#[test]
fn test_scrape_year_without_settings_exits_zero_with_message() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path());

    corpus_cmd()
        .args(["scrape", "2001", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No settings information available"));
}

#[test]
fn test_scrape_message_lists_configured_years() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path());
    std::fs::write(
        tmp.path().join("progress.json"),
        r#"{ "2021": { "continue_from": 1, "end": 2 } }"#,
    )
    .unwrap();

    corpus_cmd()
        .args(["scrape", "1999", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2021"));
}

#[test]
fn test_compile_seeded_corpus_writes_outputs_and_reports() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path());
    let root = tmp.path().join("corpus");
    // A category with a built-in translation.
    write_doc(&root, "2001", "教育・科学・学問", "1.txt", 60);
    write_doc(&root, "2021", "教育・科学・学問", "2.txt", 80);

    corpus_cmd()
        .args(["compile", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Word count info saved to"));

    let out = tmp.path().join("out");
    assert!(out.join("2001_education-science-learning.txt").is_file());
    assert!(out.join("word_counts.csv").is_file());
}

#[test]
fn test_compile_missing_corpus_root_fails_with_path() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path());

    corpus_cmd()
        .args(["compile", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("corpus"));
}

#[test]
fn test_stats_prints_file_and_word_counts() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path());
    let root = tmp.path().join("corpus");
    write_doc(&root, "2001", "教育・科学・学問", "1.txt", 10);

    corpus_cmd()
        .args(["stats", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files, 10 words"));
}

#[test]
fn test_help_shows_subcommands() {
    corpus_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("scrape")
                .and(predicate::str::contains("compile"))
                .and(predicate::str::contains("stats")),
        );
}

#[test]
fn test_version_flag_succeeds() {
    corpus_cmd().arg("--version").assert().success();
}

#[test]
fn test_unknown_flag_fails() {
    corpus_cmd()
        .args(["stats", "--definitely-not-a-flag"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_config_file_fails_with_context() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.json");
    std::fs::write(&path, "not json").unwrap();

    corpus_cmd()
        .args(["stats", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}
