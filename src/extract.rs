//! Content extraction policy for one Q&A page.
//!
//! Given the raw markup of a page and a target year, resolves the page
//! category from the breadcrumb trail and collects the text of the question
//! and answer blocks whose posted-date stamp falls in the target year.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

// Static selectors over the archive's stable markup. Safe to panic: the
// patterns are fixed and covered by tests.
#[allow(clippy::expect_used)]
static CRUMB_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#crumb a").expect("crumb selector is valid"));
#[allow(clippy::expect_used)]
static QA_UNITS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.q_article, div.a_article").expect("unit selector is valid")
});
#[allow(clippy::expect_used)]
static UNIT_TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time").expect("time selector is valid"));
#[allow(clippy::expect_used)]
static UNIT_TEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.q_text, p.q_text, div.a_text, p.a_text")
        .expect("text selector is valid")
});

/// Leading year of a posted-date stamp such as `2001/04/08 12:31`.
#[allow(clippy::expect_used)]
static STAMP_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,4})\s*(?:/|$)").expect("year regex is valid"));

/// Extraction result: the category label and the concatenated text of all
/// units posted in the target year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Top-level category from the breadcrumb trail.
    pub category: String,
    /// Unit texts in document order, joined with a double line break.
    pub text: String,
}

/// Structured extraction failures. Both are recoverable to the acquisition
/// loop; they are distinct so diagnostics can tell a malformed page from a
/// page with nothing written in the target year.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The breadcrumb trail is absent or carries no second entry.
    #[error("could not resolve a category from the breadcrumb trail")]
    CategoryUnresolved,

    /// No question or answer on the page was written in the target year.
    #[error("no content written in {year}")]
    NoMatchingContent {
        /// The requested year.
        year: i32,
    },
}

/// Extracts category and year-matched text from one page.
pub fn extract_page(html: &str, year: i32) -> Result<PageContent, ExtractError> {
    let document = Html::parse_document(html);

    let category = main_category(&document).ok_or(ExtractError::CategoryUnresolved)?;

    let texts: Vec<String> = document
        .select(&QA_UNITS)
        .filter_map(|unit| unit_text_for_year(unit, year))
        .collect();

    let text = texts.join("\n\n");
    if text.trim().is_empty() {
        return Err(ExtractError::NoMatchingContent { year });
    }

    Ok(PageContent { category, text })
}

/// The top-level category: the second breadcrumb anchor, immediately to the
/// right of the site name in the trail.
fn main_category(document: &Html) -> Option<String> {
    let anchor = document.select(&CRUMB_LINKS).nth(1)?;
    let category = collapse_text(anchor);
    (!category.is_empty()).then_some(category)
}

/// Returns the text of one question/answer unit, provided its posted-date
/// stamp is in `year`. A missing, zero, unparseable, or mismatched stamp
/// excludes the unit silently.
fn unit_text_for_year(unit: ElementRef<'_>, year: i32) -> Option<String> {
    let stamp = unit.select(&UNIT_TIME).next()?;
    let posted_year = stamp_year(&collapse_text(stamp))?;
    if posted_year == 0 || posted_year != year {
        return None;
    }

    let body = unit.select(&UNIT_TEXT).next()?;
    let text = collapse_text(body);
    (!text.is_empty()).then_some(text)
}

/// Parses the leading year of a posted-date stamp.
fn stamp_year(stamp: &str) -> Option<i32> {
    let captures = STAMP_YEAR.captures(stamp)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Collapses an element's markup to plain text: fragments trimmed,
/// whitespace-only fragments dropped, remainder joined without separators.
fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}
