//! Error taxonomy for the pipeline.
//!
//! These failures matter to callers:
//!
//! | Error | Raised by | Handling |
//! |-------|-----------|----------|
//! | [`FetchError`] | Collector | Logged per URL; the URL is skipped and the batch continues |
//! | [`PipelineError::Validation`] | Analyzer input loading | Fatal; the stage aborts |
//! | [`PipelineError::InsufficientData`] | Clustering | Recovered; clustering and PCA are skipped with a notice |
//! | [`PipelineError::EmptyVocabulary`] | Clustering | Recovered the same way |
//!
//! Everything else (I/O, CSV, JSON, YAML, chart rendering) is wrapped in a
//! [`PipelineError`] variant and treated as fatal by the stage runners.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching a single article.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Connection, TLS, redirect or body decoding failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classify a `reqwest` error raised while requesting `url`.
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = source.status() {
            FetchError::Status {
                url: url.to_string(),
                status,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Stage-level error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Input does not have the shape a stage requires.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Fewer samples than requested clusters (or `k == 0`).
    #[error("not enough articles to form {k} clusters (have {samples})")]
    InsufficientData { samples: usize, k: usize },

    /// Every TF-IDF term was pruned by the document-frequency limits.
    #[error("TF-IDF vocabulary is empty after pruning terms by document frequency")]
    EmptyVocabulary,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Building the HTTP client failed.
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

impl PipelineError {
    /// Attach a path to an [`std::io::Error`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error is recoverable (skip-and-continue) rather than fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::Fetch(_)
                | PipelineError::InsufficientData { .. }
                | PipelineError::EmptyVocabulary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let e = PipelineError::InsufficientData { samples: 3, k: 5 };
        assert_eq!(
            e.to_string(),
            "not enough articles to form 5 clusters (have 3)"
        );
        assert!(e.is_recoverable());
    }

    #[test]
    fn test_validation_is_fatal() {
        let e = PipelineError::Validation("missing column `text`".into());
        assert!(!e.is_recoverable());
        assert!(e.to_string().contains("text"));
    }

    #[test]
    fn test_io_carries_path() {
        let e = PipelineError::io(
            "results/word_frequency.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(e.to_string().contains("results/word_frequency.csv"));
    }
}
