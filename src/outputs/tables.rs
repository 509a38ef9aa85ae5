//! CSV tables for the cleaned corpus and analysis results.
//!
//! Every table has a header row. Optional values (`date`, `cluster`) are
//! written as empty fields.

use super::{CLEANED_FILE, CLUSTERS_FILE, METRICS_FILE, PCA_FILE, WORD_FREQ_FILE};
use crate::error::PipelineError;
use crate::models::{
    AnalysisBundle, ArticleMetrics, CleanedArticle, PcaCoordinate, WordFrequency,
};
use csv::{Reader, StringRecord, Writer};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Paths written by [`write_analysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPaths {
    pub metrics: PathBuf,
    pub word_frequency: PathBuf,
    pub clusters: Option<PathBuf>,
    pub coordinates: Option<PathBuf>,
}

fn create_writer(path: &Path) -> Result<Writer<File>, PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(Writer::from_writer(file))
}

fn open_reader(path: &Path) -> Result<Reader<File>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(Reader::from_reader(file))
}

/// Serialize `rows`, falling back to `header` alone when there are none.
fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), PipelineError> {
    let mut writer = create_writer(path)?;
    // `serialize` only emits headers alongside the first row.
    if rows.is_empty() {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    let mut reader = open_reader(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write the cleaned corpus to `{out_dir}/cleaned_articles.csv`.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display(), rows = articles.len()))]
pub fn write_cleaned(articles: &[CleanedArticle], out_dir: &Path) -> Result<PathBuf, PipelineError> {
    let path = out_dir.join(CLEANED_FILE);
    write_rows(&path, &["url", "title", "date", "text"], articles)?;
    info!(path = %path.display(), "Wrote cleaned articles");
    Ok(path)
}

/// Read a cleaned corpus table.
///
/// Only the `text` column is required; missing `url`, `title` or `date`
/// columns read as empty.
///
/// # Errors
///
/// [`PipelineError::Validation`] when the table has no `text` column.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn read_cleaned(path: &Path) -> Result<Vec<CleanedArticle>, PipelineError> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let text_col = column("text").ok_or_else(|| {
        PipelineError::Validation(format!(
            "{} has no `text` column (found: {})",
            path.display(),
            headers.iter().collect::<Vec<_>>().join(", ")
        ))
    })?;
    let url_col = column("url");
    let title_col = column("title");
    let date_col = column("date");

    let field = |record: &StringRecord, col: Option<usize>| -> String {
        col.and_then(|c| record.get(c)).unwrap_or_default().to_string()
    };

    let mut articles = Vec::new();
    for record in reader.records() {
        let record = record?;
        let date = field(&record, date_col);
        articles.push(CleanedArticle {
            url: field(&record, url_col),
            title: field(&record, title_col),
            date: (!date.is_empty()).then_some(date),
            text: field(&record, Some(text_col)),
        });
    }
    debug!(rows = articles.len(), "Read cleaned articles");
    Ok(articles)
}

/// Write every table of an [`AnalysisBundle`] into `out_dir`.
///
/// `article_metrics.csv` gets a `cluster` column only when clustering ran.
/// When it did not, cluster and PCA tables left over from an earlier run are
/// removed.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display()))]
pub fn write_analysis(bundle: &AnalysisBundle, out_dir: &Path) -> Result<AnalysisPaths, PipelineError> {
    let metrics = out_dir.join(METRICS_FILE);
    write_metrics(&bundle.metrics, bundle.clusters.is_some(), &metrics)?;

    let word_frequency = out_dir.join(WORD_FREQ_FILE);
    write_rows(&word_frequency, &["word", "count"], &bundle.word_frequencies)?;

    let clusters = match &bundle.clusters {
        Some(rows) => {
            let path = out_dir.join(CLUSTERS_FILE);
            write_rows(&path, &["title", "url", "cluster"], rows)?;
            Some(path)
        }
        None => {
            remove_stale(&out_dir.join(CLUSTERS_FILE))?;
            None
        }
    };

    let coordinates = match &bundle.coordinates {
        Some(rows) => {
            let path = out_dir.join(PCA_FILE);
            write_rows(&path, &["x", "y", "title", "cluster"], rows)?;
            Some(path)
        }
        None => {
            remove_stale(&out_dir.join(PCA_FILE))?;
            None
        }
    };

    info!(
        metrics = %metrics.display(),
        clustered = clusters.is_some(),
        "Wrote analysis tables"
    );
    Ok(AnalysisPaths {
        metrics,
        word_frequency,
        clusters,
        coordinates,
    })
}

fn write_metrics(rows: &[ArticleMetrics], with_cluster: bool, path: &Path) -> Result<(), PipelineError> {
    let mut writer = create_writer(path)?;
    let mut header = vec![
        "url",
        "title",
        "date",
        "text",
        "clean_text",
        "word_count",
        "sentiment_compound",
    ];
    if with_cluster {
        header.push("cluster");
    }
    writer.write_record(&header)?;

    for m in rows {
        let mut record = vec![
            m.url.clone(),
            m.title.clone(),
            m.date.clone().unwrap_or_default(),
            m.text.clone(),
            m.clean_text.clone(),
            m.word_count.to_string(),
            m.sentiment_compound.to_string(),
        ];
        if with_cluster {
            record.push(m.cluster.map(|c| c.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

fn remove_stale(path: &Path) -> Result<(), PipelineError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Removed stale table");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::io(path, e)),
    }
}

/// Read `article_metrics.csv`.
pub fn read_metrics(path: &Path) -> Result<Vec<ArticleMetrics>, PipelineError> {
    read_rows(path)
}

/// Read `word_frequency.csv`.
pub fn read_word_freqs(path: &Path) -> Result<Vec<WordFrequency>, PipelineError> {
    read_rows(path)
}

/// Read `tfidf_pca_coords.csv`.
pub fn read_coordinates(path: &Path) -> Result<Vec<PcaCoordinate>, PipelineError> {
    read_rows(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClusterAssignment;

    fn metric(title: &str, cluster: Option<usize>) -> ArticleMetrics {
        ArticleMetrics {
            url: format!("https://example.com/{title}"),
            title: title.to_string(),
            date: None,
            text: "Raw, \"quoted\" text".to_string(),
            clean_text: "raw quoted text".to_string(),
            word_count: 3,
            sentiment_compound: -0.25,
            cluster,
        }
    }

    fn bundle(clustered: bool) -> AnalysisBundle {
        let labels = [0usize, 1];
        AnalysisBundle {
            metrics: labels
                .iter()
                .map(|&c| metric(&format!("t{c}"), clustered.then_some(c)))
                .collect(),
            word_frequencies: vec![WordFrequency {
                word: "late".into(),
                count: 4,
            }],
            clusters: clustered.then(|| {
                labels
                    .iter()
                    .map(|&c| ClusterAssignment {
                        title: format!("t{c}"),
                        url: format!("https://example.com/t{c}"),
                        cluster: c,
                    })
                    .collect()
            }),
            coordinates: clustered.then(|| {
                labels
                    .iter()
                    .map(|&c| PcaCoordinate {
                        x: c as f64,
                        y: -(c as f64),
                        title: format!("t{c}"),
                        cluster: c,
                    })
                    .collect()
            }),
        }
    }

    #[test]
    fn test_cleaned_table_keeps_optional_date() {
        let dir = tempfile::tempdir().unwrap();
        let articles = vec![
            CleanedArticle {
                url: "u1".into(),
                title: "T1".into(),
                date: Some("2024-03-01".into()),
                text: "first, with a comma".into(),
            },
            CleanedArticle {
                url: "u2".into(),
                title: "T2".into(),
                date: None,
                text: "second".into(),
            },
        ];
        let path = write_cleaned(&articles, dir.path()).unwrap();
        assert_eq!(read_cleaned(&path).unwrap(), articles);
    }

    #[test]
    fn test_empty_cleaned_table_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cleaned(&[], dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "url,title,date,text");
        assert!(read_cleaned(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_cleaned_requires_text_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "url,title\nhttps://a,Title\n").unwrap();
        assert!(matches!(read_cleaned(&path), Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_read_cleaned_defaults_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text_only.csv");
        fs::write(&path, "text\nonly the body\n").unwrap();
        let rows = read_cleaned(&path).unwrap();
        assert_eq!(rows[0].text, "only the body");
        assert_eq!(rows[0].url, "");
        assert_eq!(rows[0].date, None);
    }

    #[test]
    fn test_metrics_cluster_column_only_when_clustered() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_analysis(&bundle(true), dir.path()).unwrap();
        let header = fs::read_to_string(&paths.metrics).unwrap();
        assert!(header.lines().next().unwrap().ends_with(",cluster"));
        let back = read_metrics(&paths.metrics).unwrap();
        assert_eq!(back[1].cluster, Some(1));
        assert_eq!(back[0].sentiment_compound, -0.25);

        let paths = write_analysis(&bundle(false), dir.path()).unwrap();
        let header = fs::read_to_string(&paths.metrics).unwrap();
        assert!(header.lines().next().unwrap().ends_with(",sentiment_compound"));
        assert!(read_metrics(&paths.metrics).unwrap().iter().all(|m| m.cluster.is_none()));
    }

    #[test]
    fn test_skipped_clustering_removes_stale_tables() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_analysis(&bundle(true), dir.path()).unwrap();
        let coords = first.coordinates.unwrap();
        assert_eq!(read_coordinates(&coords).unwrap().len(), 2);

        let second = write_analysis(&bundle(false), dir.path()).unwrap();
        assert!(second.clusters.is_none());
        assert!(!dir.path().join(CLUSTERS_FILE).exists());
        assert!(!coords.exists());
        assert_eq!(read_word_freqs(&second.word_frequency).unwrap()[0].count, 4);
    }

    #[test]
    fn test_empty_word_frequency_table_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let empty = AnalysisBundle {
            metrics: Vec::new(),
            word_frequencies: Vec::new(),
            clusters: None,
            coordinates: None,
        };
        let paths = write_analysis(&empty, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&paths.word_frequency).unwrap().trim(), "word,count");
        assert!(read_word_freqs(&paths.word_frequency).unwrap().is_empty());
    }
}
