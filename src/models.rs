//! Data models that flow between pipeline stages.
//!
//! Each stage reads and writes one of these record types:
//! - [`ArticleRecord`] / [`RawCollection`]: scraped articles, written as JSON
//! - [`CleanedArticle`]: filtered, markup-free articles, written as CSV
//! - [`ArticleMetrics`], [`WordFrequency`], [`ClusterAssignment`],
//!   [`PcaCoordinate`]: analysis outputs, written as CSV
//!
//! [`StageOutcome`] is the tagged result every stage returns for expected
//! partial conditions (skipped URLs, skipped clustering). Fatal problems are
//! reported as [`crate::error::PipelineError`] instead.

use serde::{Deserialize, Serialize};

/// A raw article as scraped from its page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The page the article was fetched from.
    pub url: String,
    /// Document title, or the URL when the page has none.
    pub title: String,
    /// Machine-readable or visible date of the first `<time>` element.
    pub date: Option<String>,
    /// Paragraph text joined with blank lines.
    pub text: String,
}

/// The raw record file written by the collector.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawCollection {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
    /// RFC 3339 UTC timestamp of the collection run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<String>,
}

/// An article that passed markup stripping and the minimum length filter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CleanedArticle {
    pub url: String,
    pub title: String,
    pub date: Option<String>,
    pub text: String,
}

/// Per-article analysis results.
///
/// `cluster` is `None` unless clustering ran.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleMetrics {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub clean_text: String,
    pub word_count: usize,
    pub sentiment_compound: f64,
    #[serde(default)]
    pub cluster: Option<usize>,
}

/// One row of the word frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Cluster label of a single article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClusterAssignment {
    pub title: String,
    pub url: String,
    pub cluster: usize,
}

/// 2D projection of an article's TF-IDF vector.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PcaCoordinate {
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub cluster: usize,
}

/// Everything the analyzer produces for one corpus.
///
/// `clusters` and `coordinates` are `None` when clustering was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisBundle {
    pub metrics: Vec<ArticleMetrics>,
    pub word_frequencies: Vec<WordFrequency>,
    pub clusters: Option<Vec<ClusterAssignment>>,
    pub coordinates: Option<Vec<PcaCoordinate>>,
}

/// Result of a stage that may succeed with reduced output.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// Everything requested was produced.
    Complete(T),
    /// Data was produced, but some items or sub-stages were skipped.
    Partial { data: T, notices: Vec<String> },
}

impl<T> StageOutcome<T> {
    /// Build an outcome from data and the notices gathered while producing it.
    pub fn from_notices(data: T, notices: Vec<String>) -> Self {
        if notices.is_empty() {
            StageOutcome::Complete(data)
        } else {
            StageOutcome::Partial { data, notices }
        }
    }

    pub fn data(&self) -> &T {
        match self {
            StageOutcome::Complete(data) | StageOutcome::Partial { data, .. } => data,
        }
    }

    pub fn notices(&self) -> &[String] {
        match self {
            StageOutcome::Complete(_) => &[],
            StageOutcome::Partial { notices, .. } => notices,
        }
    }

    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        matches!(self, StageOutcome::Complete(_))
    }

    #[cfg(test)]
    pub fn into_data(self) -> T {
        match self {
            StageOutcome::Complete(data) | StageOutcome::Partial { data, .. } => data,
        }
    }
}
