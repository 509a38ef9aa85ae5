//! # ADHD Text Pipeline
//!
//! A small, file-mediated pipeline that scrapes a fixed list of expert
//! articles on ADHD and time management, cleans them, analyzes their
//! vocabulary and tone, and renders figures.
//!
//! ## Features
//!
//! - Scrapes title, date and paragraph text from ordinary article pages
//! - Strips leftover markup and drops articles that are too short
//! - Word frequencies, lexicon-based compound sentiment, TF-IDF, k-means
//!   clustering and a 2D principal component projection
//! - SVG charts of top words, sentiment, keyword mentions and clusters
//!
//! ## Usage
//!
//! ```sh
//! adhd_text_pipeline run
//! adhd_text_pipeline analyze --k 3
//! ```
//!
//! ## Architecture
//!
//! The stages run strictly in sequence and hand over through files:
//! 1. **Collect**: fetch and parse each URL into `data/raw/collected_raw.json`
//! 2. **Clean**: normalize markup, filter short texts into `data/processed/cleaned_articles.csv`
//! 3. **Analyze**: write the result tables into `results/`
//! 4. **Visualize**: render figures into `results/figures/`

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod cleaner;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod text;
mod utils;
mod visualize;

use cli::{Cli, Command};
use config::PipelineConfig;
use pipeline::{PipelinePaths, StageSummary};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("adhd_text_pipeline starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.command, "Parsed CLI arguments");

    let config = match PipelineConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    let summaries: Vec<StageSummary> = match args.command {
        Command::Collect { out_dir } => vec![pipeline::run_collect(&config, &out_dir).await?],
        Command::Clean { in_path, out_dir } => {
            vec![pipeline::run_clean(&config, &in_path, &out_dir).await?]
        }
        Command::Analyze {
            in_path,
            out_dir,
            k,
        } => vec![pipeline::run_analyze(&config, &in_path, &out_dir, k).await?],
        Command::Visualize {
            analysis_dir,
            out_dir,
        } => vec![pipeline::run_visualize(&config, &analysis_dir, &out_dir).await?],
        Command::Run { k } => pipeline::run_all(&config, &PipelinePaths::default(), k).await?,
    };

    for summary in &summaries {
        println!("{summary}");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
