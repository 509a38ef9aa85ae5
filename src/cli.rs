//! Command-line interface definitions.
//!
//! One subcommand per pipeline stage plus `run` for the whole pipeline. The
//! configuration file can be given with `--config` or the `PIPELINE_CONFIG`
//! environment variable.

use crate::outputs::{
    DEFAULT_CLEANED_PATH, DEFAULT_FIGURES_DIR, DEFAULT_PROCESSED_DIR, DEFAULT_RAW_DIR,
    DEFAULT_RAW_PATH, DEFAULT_RESULTS_DIR,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the article analysis pipeline.
///
/// # Examples
///
/// ```sh
/// # Whole pipeline with default paths
/// adhd_text_pipeline run
///
/// # Single stages
/// adhd_text_pipeline collect --out-dir data/raw
/// adhd_text_pipeline analyze --k 3
///
/// # With a configuration file
/// adhd_text_pipeline --config pipeline.yaml run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, global = true, env = "PIPELINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Fetch the configured articles into a raw JSON file
    Collect {
        #[arg(long, default_value = DEFAULT_RAW_DIR)]
        out_dir: PathBuf,
    },
    /// Strip markup and drop short articles
    Clean {
        #[arg(long, default_value = DEFAULT_RAW_PATH)]
        in_path: PathBuf,
        #[arg(long, default_value = DEFAULT_PROCESSED_DIR)]
        out_dir: PathBuf,
    },
    /// Compute word frequencies, sentiment, clusters and projection
    Analyze {
        #[arg(long, default_value = DEFAULT_CLEANED_PATH)]
        in_path: PathBuf,
        #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
        out_dir: PathBuf,
        /// Number of clusters (overrides the configuration file)
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Render the figures from the analysis tables
    Visualize {
        #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
        analysis_dir: PathBuf,
        #[arg(long, default_value = DEFAULT_FIGURES_DIR)]
        out_dir: PathBuf,
    },
    /// Run every stage in order with the default paths
    Run {
        /// Number of clusters (overrides the configuration file)
        #[arg(short, long)]
        k: Option<usize>,
    },
}
