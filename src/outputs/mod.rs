//! File persistence between stages.
//!
//! # Submodules
//!
//! - [`json`]: the raw record file written by the collector
//! - [`tables`]: CSV tables for the cleaned corpus and analysis results
//!
//! # Output Structure
//!
//! ```text
//! data/
//! ├── raw/collected_raw.json
//! └── processed/cleaned_articles.csv
//! results/
//! ├── article_metrics.csv
//! ├── word_frequency.csv
//! ├── article_clusters.csv     # only when clustering ran
//! ├── tfidf_pca_coords.csv     # only when clustering ran
//! └── figures/*.svg
//! ```

pub mod json;
pub mod tables;

pub const RAW_FILE: &str = "collected_raw.json";
pub const CLEANED_FILE: &str = "cleaned_articles.csv";
pub const METRICS_FILE: &str = "article_metrics.csv";
pub const WORD_FREQ_FILE: &str = "word_frequency.csv";
pub const CLUSTERS_FILE: &str = "article_clusters.csv";
pub const PCA_FILE: &str = "tfidf_pca_coords.csv";

pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";
pub const DEFAULT_RAW_PATH: &str = "data/raw/collected_raw.json";
pub const DEFAULT_CLEANED_PATH: &str = "data/processed/cleaned_articles.csv";
pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_FIGURES_DIR: &str = "results/figures";
