//! Stage runners.
//!
//! Each runner reads its input file, runs one stage and writes its outputs,
//! returning a [`StageSummary`] for the command line. Expected partial
//! results (skipped URLs, skipped clustering, skipped charts) are carried as
//! notices; only fatal problems come back as errors.

use crate::analysis;
use crate::cleaner;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::models::{RawCollection, StageOutcome};
use crate::outputs::{self, json, tables};
use crate::scrapers::article;
use crate::text::Stopwords;
use crate::utils::ensure_writable_dir;
use crate::visualize;
use chrono::{SecondsFormat, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// What a stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSummary {
    pub stage: &'static str,
    /// Main output file, or directory for the figures.
    pub output: PathBuf,
    pub records: usize,
    pub notices: Vec<String>,
}

impl StageSummary {
    fn from_outcome<T>(
        stage: &'static str,
        output: PathBuf,
        records: usize,
        outcome: &StageOutcome<T>,
    ) -> Self {
        for notice in outcome.notices() {
            warn!(stage, %notice, "Stage notice");
        }
        Self {
            stage,
            output,
            records,
            notices: outcome.notices().to_vec(),
        }
    }
}

impl fmt::Display for StageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} records -> {}",
            self.stage,
            self.records,
            self.output.display()
        )?;
        if !self.notices.is_empty() {
            write!(f, " ({} notices)", self.notices.len())?;
        }
        Ok(())
    }
}

/// Default locations of every stage's files under `root`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePaths {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub results_dir: PathBuf,
    pub figures_dir: PathBuf,
}

impl PipelinePaths {
    pub fn under(root: &Path) -> Self {
        Self {
            raw_dir: root.join(outputs::DEFAULT_RAW_DIR),
            processed_dir: root.join(outputs::DEFAULT_PROCESSED_DIR),
            results_dir: root.join(outputs::DEFAULT_RESULTS_DIR),
            figures_dir: root.join(outputs::DEFAULT_FIGURES_DIR),
        }
    }

    pub fn raw_file(&self) -> PathBuf {
        self.raw_dir.join(outputs::RAW_FILE)
    }

    pub fn cleaned_file(&self) -> PathBuf {
        self.processed_dir.join(outputs::CLEANED_FILE)
    }
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self::under(Path::new(""))
    }
}

/// Scrape the configured URLs into `{out_dir}/collected_raw.json`.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display()))]
pub async fn run_collect(config: &PipelineConfig, out_dir: &Path) -> Result<StageSummary, PipelineError> {
    ensure_writable_dir(out_dir).await?;
    let client = article::http_client(&config.fetch_settings())?;
    let outcome = article::collect(&client, &config.urls).await;

    let summary_records = outcome.data().len();
    let collection = RawCollection {
        articles: outcome.data().clone(),
        collected_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    };
    let path = json::write_raw(&collection, out_dir).await?;
    Ok(StageSummary::from_outcome("collect", path, summary_records, &outcome))
}

/// Normalize and filter the raw records into `{out_dir}/cleaned_articles.csv`.
#[instrument(level = "info", skip_all, fields(in_path = %in_path.display(), out_dir = %out_dir.display()))]
pub async fn run_clean(
    config: &PipelineConfig,
    in_path: &Path,
    out_dir: &Path,
) -> Result<StageSummary, PipelineError> {
    let raw = json::read_raw(in_path).await?;
    let cleaned = cleaner::clean(&raw.articles, config.min_text_chars);

    ensure_writable_dir(out_dir).await?;
    let path = tables::write_cleaned(&cleaned, out_dir)?;
    let discarded = raw.articles.len() - cleaned.len();
    info!(kept = cleaned.len(), discarded, "Cleaned articles");

    Ok(StageSummary {
        stage: "clean",
        output: path,
        records: cleaned.len(),
        notices: Vec::new(),
    })
}

/// Analyze the cleaned table and write the result tables into `out_dir`.
///
/// `k` overrides the configured number of clusters.
#[instrument(level = "info", skip_all, fields(in_path = %in_path.display(), out_dir = %out_dir.display()))]
pub async fn run_analyze(
    config: &PipelineConfig,
    in_path: &Path,
    out_dir: &Path,
    k: Option<usize>,
) -> Result<StageSummary, PipelineError> {
    let articles = tables::read_cleaned(in_path)?;
    let mut settings = config.analysis_settings();
    if let Some(k) = k {
        settings.clusters = k;
    }

    let outcome = analysis::analyze(&articles, &settings, &Stopwords::default())?;

    ensure_writable_dir(out_dir).await?;
    let paths = tables::write_analysis(outcome.data(), out_dir)?;
    Ok(StageSummary::from_outcome(
        "analyze",
        paths.metrics,
        outcome.data().metrics.len(),
        &outcome,
    ))
}

/// Render the figures for the tables in `analysis_dir` into `out_dir`.
#[instrument(level = "info", skip_all, fields(analysis_dir = %analysis_dir.display(), out_dir = %out_dir.display()))]
pub async fn run_visualize(
    config: &PipelineConfig,
    analysis_dir: &Path,
    out_dir: &Path,
) -> Result<StageSummary, PipelineError> {
    let outcome =
        visualize::render_all(analysis_dir, out_dir, config.top_n_chart, &config.keywords).await?;
    Ok(StageSummary::from_outcome(
        "visualize",
        out_dir.to_path_buf(),
        outcome.data().len(),
        &outcome,
    ))
}

/// Run all four stages in order with the default layout under `paths`.
#[instrument(level = "info", skip_all)]
pub async fn run_all(
    config: &PipelineConfig,
    paths: &PipelinePaths,
    k: Option<usize>,
) -> Result<Vec<StageSummary>, PipelineError> {
    let collect = run_collect(config, &paths.raw_dir).await?;
    let clean = run_clean(config, &paths.raw_file(), &paths.processed_dir).await?;
    let analyze = run_analyze(config, &paths.cleaned_file(), &paths.results_dir, k).await?;
    let visualize = run_visualize(config, &paths.results_dir, &paths.figures_dir).await?;
    Ok(vec![collect, clean, analyze, visualize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::{CLUSTERS_FILE, PCA_FILE};
    use std::fs;

    const E2E_TEXT: &str = "<p>Hello world, this is a test article about time management \
        for people with ADHD who struggle with planning.</p>";

    fn write_raw_json(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("collected_raw.json");
        fs::write(&path, body).unwrap();
        path
    }

    fn five_article_table(dir: &Path) -> PathBuf {
        let path = dir.join("cleaned_articles.csv");
        let rows = [
            "Time blindness makes planning hard and deadlines slip past without warning.",
            "Planning routines with timers helps people who are always late to meetings.",
            "Procrastination is not laziness; the task feels heavy and the delay grows.",
            "A morning routine and a visual calendar reduce the stress of being late.",
            "Breaking a large task into steps makes procrastination easier to overcome.",
        ];
        let mut csv = String::from("url,title,date,text\n");
        for (i, text) in rows.iter().enumerate() {
            csv.push_str(&format!("https://example.com/{i},Article {i},,\"{text}\"\n"));
        }
        fs::write(&path, csv).unwrap();
        path
    }

    #[tokio::test]
    async fn test_raw_json_to_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_raw_json(
            dir.path(),
            &serde_json::json!({
                "articles": [
                    {"url": "a", "title": "T", "date": null, "text": E2E_TEXT},
                    {"url": "b", "title": "Short", "date": null, "text": "<p>Too short.</p>"}
                ]
            })
            .to_string(),
        );
        let config = PipelineConfig::default();

        let clean = run_clean(&config, &raw, &dir.path().join("processed")).await.unwrap();
        assert_eq!(clean.records, 1);

        let analyze = run_analyze(&config, &clean.output, &dir.path().join("results"), None)
            .await
            .unwrap();
        assert_eq!(analyze.records, 1);
        assert_eq!(analyze.notices.len(), 1);

        let metrics = tables::read_metrics(&analyze.output).unwrap();
        assert_eq!(metrics[0].url, "a");
        assert_eq!(metrics[0].word_count, 12);
        assert!(metrics[0].clean_text.starts_with("hello world this is a test article"));
        assert!(!metrics[0].text.contains('<'));
        assert_eq!(metrics[0].cluster, None);
        assert!(!dir.path().join("results").join(PCA_FILE).exists());
    }

    #[tokio::test]
    async fn test_analyze_rejects_table_without_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_articles.csv");
        fs::write(&path, "url,title,date\nu,t,\n").unwrap();
        let result = run_analyze(&PipelineConfig::default(), &path, dir.path(), None).await;
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cluster_outputs_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let input = five_article_table(dir.path());
        let config = PipelineConfig::default();

        let first = dir.path().join("first");
        let second = dir.path().join("second");
        run_analyze(&config, &input, &first, Some(2)).await.unwrap();
        run_analyze(&config, &input, &second, Some(2)).await.unwrap();

        for name in [CLUSTERS_FILE, PCA_FILE] {
            let a = fs::read(first.join(name)).unwrap();
            let b = fs::read(second.join(name)).unwrap();
            assert_eq!(a, b, "{name} differs between runs");
        }
    }

    #[tokio::test]
    async fn test_too_few_articles_skip_clustering() {
        let dir = tempfile::tempdir().unwrap();
        let input = five_article_table(dir.path());
        let summary = run_analyze(&PipelineConfig::default(), &input, dir.path(), Some(6))
            .await
            .unwrap();
        assert_eq!(summary.records, 5);
        assert!(summary.notices[0].contains("not enough articles"));
        assert!(!dir.path().join(CLUSTERS_FILE).exists());
    }

    #[tokio::test]
    async fn test_run_all_survives_unreachable_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            urls: vec!["http://127.0.0.1:1/article".to_string()],
            timeout_secs: 2,
            ..PipelineConfig::default()
        };
        let paths = PipelinePaths::under(dir.path());

        let summaries = run_all(&config, &paths, None).await.unwrap();
        let stages: Vec<&str> = summaries.iter().map(|s| s.stage).collect();
        assert_eq!(stages, ["collect", "clean", "analyze", "visualize"]);
        assert_eq!(summaries[0].records, 0);
        assert_eq!(summaries[0].notices.len(), 1);
        assert!(paths.raw_file().exists());
        assert_eq!(summaries[3].records, 0);
        assert_eq!(summaries[3].notices.len(), 4);
    }

    #[test]
    fn test_summary_display() {
        let summary = StageSummary {
            stage: "clean",
            output: PathBuf::from("data/processed/cleaned_articles.csv"),
            records: 4,
            notices: vec!["x".into()],
        };
        assert_eq!(
            summary.to_string(),
            "clean: 4 records -> data/processed/cleaned_articles.csv (1 notices)"
        );
    }
}
