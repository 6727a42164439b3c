//! Crawl and compilation configuration.
//!
//! Everything that used to be a process-wide constant (corpus root, excluded
//! categories, category name translations) lives in an explicit
//! [`CorpusConfig`] passed into the pipeline and balancer, so tests can run
//! isolated against temporary corpora.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default site serving the Q&A archive.
pub const DEFAULT_BASE_URL: &str = "https://oshiete.goo.ne.jp";

/// Configuration for the acquisition pipeline and corpus balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    /// Root directory of the on-disk corpus (`<root>/<year>/<category>/<n>.txt`).
    pub corpus_root: PathBuf,
    /// Base URL of the Q&A site; page addresses are `<base>/qa/<id>.html`.
    pub base_url: String,
    /// The two years the diachronic corpus compares.
    pub years: [String; 2],
    /// Path of the JSON progress file keyed by year.
    pub progress_path: PathBuf,
    /// Path of the acquisition log; defaults to `<corpus_root>/log.csv`.
    pub log_path: Option<PathBuf>,
    /// Directory for compiled corpus files; defaults to `corpus_root`.
    pub output_dir: Option<PathBuf>,
    /// Categories excluded from balancing even when present in both years.
    pub excluded_categories: Vec<String>,
    /// Category name -> ASCII-safe slug used in output filenames.
    pub category_translations: BTreeMap<String, String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("oshiete_corpus"),
            base_url: DEFAULT_BASE_URL.to_string(),
            years: ["2001".to_string(), "2021".to_string()],
            progress_path: PathBuf::from("progress.json"),
            log_path: None,
            output_dir: None,
            excluded_categories: vec![
                "gooサービス".to_string(),
                "公式アカウントからの質問".to_string(),
            ],
            category_translations: default_translations(),
        }
    }
}

fn default_translations() -> BTreeMap<String, String> {
    [
        ("ビジネス・キャリア", "business-career"),
        ("悩み相談・人生相談", "life-advice"),
        ("エンターテインメント・スポーツ", "entertainment-sports"),
        ("ニュース・災害・社会制度", "news-disasters-social-structure"),
        ("趣味・アウトドア・車", "hobbies-outdoors-cars"),
        ("インターネット・Webサービス", "internet-web-services"),
        ("地域情報・旅行・お出かけ", "local-info-travel-going-out"),
        ("お金・保険・資産運用", "money-insurance-wealth-management"),
        ("パソコン・スマホ・電化製品", "computers-smartphones-electronics"),
        ("暮らし・生活・行事", "lifestyle-events"),
        ("教育・科学・学問", "education-science-learning"),
        ("健康・美容・ファッション", "health-beauty-fashion"),
        ("コンピューター・テクノロジー", "computing-technology"),
    ]
    .into_iter()
    .map(|(jp, en)| (jp.to_string(), en.to_string()))
    .collect()
}

impl CorpusConfig {
    /// Loads configuration from a JSON file, or the defaults when `path` is
    /// `None`. The result is validated either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates config values against pipeline constraints.
    pub fn validate(&self) -> Result<()> {
        if Url::parse(&self.base_url).is_err() {
            bail!("Invalid config value for `base_url`: {}", self.base_url);
        }
        for year in &self.years {
            if year.parse::<i32>().is_err() {
                bail!("Invalid config value for `years`: {year}. Expected a 4-digit year");
            }
        }
        if self.years[0] == self.years[1] {
            bail!(
                "Invalid config value for `years`: both entries are {}. Expected two distinct years",
                self.years[0]
            );
        }
        for (category, slug) in &self.category_translations {
            if slug.is_empty() || !slug.is_ascii() {
                bail!(
                    "Invalid config value for `category_translations`: \
                     slug for {category} must be non-empty ASCII, got {slug:?}"
                );
            }
        }
        Ok(())
    }

    /// Canonical page address for a numeric content ID. Doubles as the
    /// deduplication key in the acquisition log.
    #[must_use]
    pub fn page_url(&self, id: u64) -> String {
        format!("{}/qa/{id}.html", self.base_url.trim_end_matches('/'))
    }

    /// Path of the acquisition log.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| self.corpus_root.join("log.csv"))
    }

    /// Directory compiled corpus files are written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.corpus_root.clone())
    }

    /// ASCII slug for a category name, if configured.
    #[must_use]
    pub fn slug_for(&self, category: &str) -> Option<&str> {
        self.category_translations.get(category).map(String::as_str)
    }
}
