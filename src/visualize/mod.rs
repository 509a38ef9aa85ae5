//! Figures for the analysis results.
//!
//! Four independent charts are rendered from the tables in the analysis
//! directory:
//!
//! | Figure | Source table |
//! |--------|--------------|
//! | `top_words.svg` | `word_frequency.csv` |
//! | `sentiment_by_article.svg` | `article_metrics.csv` |
//! | `keyword_counts.svg` | `article_metrics.csv` |
//! | `pca_clusters.svg` | `tfidf_pca_coords.csv` (optional) |
//!
//! A chart whose input is absent or empty is skipped with a notice rather
//! than failing the stage.

pub mod charts;

use crate::error::PipelineError;
use crate::models::StageOutcome;
use crate::outputs::{METRICS_FILE, PCA_FILE, WORD_FREQ_FILE};
use crate::utils::ensure_writable_dir;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const TOP_WORDS_FIGURE: &str = "top_words.svg";
pub const SENTIMENT_FIGURE: &str = "sentiment_by_article.svg";
pub const KEYWORDS_FIGURE: &str = "keyword_counts.svg";
pub const PCA_FIGURE: &str = "pca_clusters.svg";

/// Longest article title shown on a chart.
pub const LABEL_CHARS: usize = 60;

/// What happened to a single chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Rendered(PathBuf),
    /// Not drawn; the reason is user-facing.
    Skipped(String),
}

/// Case-insensitive, non-overlapping occurrences of each keyword in `text`.
///
/// Matches are substrings, so `"late"` also counts inside `"later"`. An
/// empty keyword counts zero.
pub fn count_keywords<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<usize> {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .map(|k| {
            let needle = k.as_ref().to_lowercase();
            if needle.is_empty() {
                0
            } else {
                haystack.matches(needle.as_str()).count()
            }
        })
        .collect()
}

/// Render every chart from `analysis_dir` into `out_dir`.
///
/// # Returns
///
/// The paths of the rendered figures, with one notice per skipped chart.
///
/// # Errors
///
/// Unreadable required tables, an unwritable `out_dir` and drawing failures
/// are fatal.
#[instrument(level = "info", skip_all, fields(analysis_dir = %analysis_dir.display(), out_dir = %out_dir.display()))]
pub async fn render_all(
    analysis_dir: &Path,
    out_dir: &Path,
    top_n: usize,
    keywords: &[String],
) -> Result<StageOutcome<Vec<PathBuf>>, PipelineError> {
    ensure_writable_dir(out_dir).await?;

    let metrics = analysis_dir.join(METRICS_FILE);
    let outcomes = vec![
        charts::plot_top_words(
            &analysis_dir.join(WORD_FREQ_FILE),
            &out_dir.join(TOP_WORDS_FIGURE),
            top_n,
        )?,
        charts::plot_sentiment(&metrics, &out_dir.join(SENTIMENT_FIGURE))?,
        charts::plot_keyword_counts(&metrics, keywords, &out_dir.join(KEYWORDS_FIGURE))?,
        charts::plot_pca_scatter(&analysis_dir.join(PCA_FILE), &out_dir.join(PCA_FIGURE))?,
    ];

    let mut rendered = Vec::new();
    let mut notices = Vec::new();
    for outcome in outcomes {
        match outcome {
            ChartOutcome::Rendered(path) => rendered.push(path),
            ChartOutcome::Skipped(reason) => notices.push(reason),
        }
    }
    info!(rendered = rendered.len(), skipped = notices.len(), "Rendered figures");
    Ok(StageOutcome::from_notices(rendered, notices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_keywords_case_insensitive_substrings() {
        let counts = count_keywords(
            "Late again, later than planned. TASK after task.",
            &["late", "task", "delay", ""],
        );
        assert_eq!(counts, vec![2, 2, 0, 0]);
    }

    #[test]
    fn test_count_keywords_non_overlapping() {
        assert_eq!(count_keywords("aaaa", &["aa"]), vec![2]);
    }

    #[tokio::test]
    async fn test_render_all_missing_tables_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_all(dir.path(), &dir.path().join("figures"), 20, &[]).await;
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }
}
