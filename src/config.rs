//! Pipeline configuration.
//!
//! All knobs have defaults matching the published corpus run, so the
//! pipeline works without any configuration file. A YAML file can override
//! any subset of fields:
//!
//! ```yaml
//! clusters: 3
//! keywords: [time, late, routine]
//! urls:
//!   - https://example.com/article
//! ```
//!
//! Command-line flags take precedence over file values.

use crate::analysis::frequency::{CHART_TOP_N, EXPORT_TOP_N};
use crate::cleaner::MIN_TEXT_CHARS;
use crate::error::PipelineError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Article pages scraped by `collect`.
pub const ARTICLE_URLS: &[&str] = &[
    "https://www.additudemag.com/how-to-plan-ahead-when-you-have-adhd-understand-time/",
    "https://www.additudemag.com/slideshows/stop-wasting-time/",
    "https://www.additudemag.com/time-on-your-side/",
    "https://psychcentral.com/adhd/why-are-people-with-adhd-always-late",
    "https://psychcentral.com/adhd/time-management-tips-for-people-with-adhd",
    "https://psychcentral.com/adhd/the-adhd-iceberg",
];

/// Keywords counted per article by the keyword chart.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "time",
    "late",
    "planning",
    "procrastination",
    "routine",
    "task",
    "delay",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0 Safari/537.36";

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Pages to scrape, in order.
    pub urls: Vec<String>,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Cleaned articles shorter than this (in characters) are discarded.
    pub min_text_chars: usize,
    /// Rows kept in `word_frequency.csv`.
    pub top_n_export: usize,
    /// Bars drawn in the top words chart.
    pub top_n_chart: usize,
    /// Number of k-means clusters.
    pub clusters: usize,
    /// Seed for k-means initialization.
    pub seed: u64,
    /// Number of k-means restarts.
    pub n_init: usize,
    /// TF-IDF: drop terms present in more than this share of documents.
    pub max_df: f64,
    /// TF-IDF: drop terms present in fewer than this many documents.
    pub min_df: usize,
    /// Keywords counted by the keyword chart.
    pub keywords: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            urls: ARTICLE_URLS.iter().map(|u| u.to_string()).collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            min_text_chars: MIN_TEXT_CHARS,
            top_n_export: EXPORT_TOP_N,
            top_n_chart: CHART_TOP_N,
            clusters: 2,
            seed: 42,
            n_init: 10,
            max_df: 0.85,
            min_df: 1,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML document, then validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(urls = config.urls.len(), k = config.clusters, "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, PipelineError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject values the stages cannot work with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for raw in &self.urls {
            let parsed = Url::parse(raw)
                .map_err(|e| PipelineError::Validation(format!("invalid URL {raw:?}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(PipelineError::Validation(format!(
                    "unsupported URL scheme in {raw:?}"
                )));
            }
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(PipelineError::Validation(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.n_init == 0 {
            return Err(PipelineError::Validation("n_init must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(PipelineError::Validation(
                "timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            clusters: self.clusters,
            seed: self.seed,
            n_init: self.n_init,
            top_n: self.top_n_export,
            max_df: self.max_df,
            min_df: self.min_df,
        }
    }
}

/// HTTP settings for the collector.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        PipelineConfig::default().fetch_settings()
    }
}

/// Parameters of the analysis stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub clusters: usize,
    pub seed: u64,
    pub n_init: usize,
    pub top_n: usize,
    pub max_df: f64,
    pub min_df: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        PipelineConfig::default().analysis_settings()
    }
}
