//! Text analysis over the cleaned corpus.
//!
//! # Submodules
//!
//! - [`frequency`]: global word counts
//! - [`lexicon`] / [`sentiment`]: compound sentiment per article
//! - [`tfidf`]: document-term matrix
//! - [`kmeans`]: cluster labels over TF-IDF rows
//! - [`pca`]: 2D projection of TF-IDF rows
//!
//! [`analyze`] runs all of them in order and bundles the results. Clustering
//! and projection are optional: with fewer articles than clusters, or with an
//! empty vocabulary, they are skipped and the outcome carries a notice.

pub mod frequency;
pub mod kmeans;
pub mod lexicon;
pub mod pca;
pub mod sentiment;
pub mod tfidf;

use crate::config::AnalysisSettings;
use crate::error::PipelineError;
use crate::models::{
    AnalysisBundle, ArticleMetrics, CleanedArticle, ClusterAssignment, PcaCoordinate,
    StageOutcome,
};
use crate::text::{Stopwords, clean_text, tokenize};
use kmeans::KMeans;
use pca::Pca;
use sentiment::compute_sentiment;
use tfidf::TfidfVectorizer;
use tracing::{info, instrument, warn};

/// Analyze the cleaned corpus.
///
/// # Errors
///
/// Only errors that are not recoverable. Skipped clustering comes back as a
/// notice on the outcome.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), k = settings.clusters))]
pub fn analyze(
    articles: &[CleanedArticle],
    settings: &AnalysisSettings,
    stopwords: &Stopwords,
) -> Result<StageOutcome<AnalysisBundle>, PipelineError> {
    let cleaned: Vec<String> = articles.iter().map(|a| clean_text(&a.text)).collect();
    let sentiments = compute_sentiment(&cleaned);
    let mut metrics: Vec<ArticleMetrics> = articles
        .iter()
        .zip(cleaned)
        .zip(sentiments)
        .map(|((article, clean), sentiment_compound)| ArticleMetrics {
            url: article.url.clone(),
            title: article.title.clone(),
            date: article.date.clone(),
            text: article.text.clone(),
            word_count: tokenize(&clean, stopwords).len(),
            sentiment_compound,
            clean_text: clean,
            cluster: None,
        })
        .collect();

    let texts: Vec<&str> = metrics.iter().map(|m| m.clean_text.as_str()).collect();
    let word_frequencies = frequency::compute_word_freqs(&texts, settings.top_n, stopwords);

    let mut notices = Vec::new();
    let mut clusters = None;
    let mut coordinates = None;

    match cluster_and_project(&texts, settings) {
        Ok((labels, points)) => {
            for (metric, &label) in metrics.iter_mut().zip(&labels) {
                metric.cluster = Some(label);
            }
            clusters = Some(
                metrics
                    .iter()
                    .zip(&labels)
                    .map(|(m, &cluster)| ClusterAssignment {
                        title: m.title.clone(),
                        url: m.url.clone(),
                        cluster,
                    })
                    .collect(),
            );
            coordinates = Some(
                metrics
                    .iter()
                    .zip(points)
                    .zip(&labels)
                    .map(|((m, (x, y)), &cluster)| PcaCoordinate {
                        x,
                        y,
                        title: m.title.clone(),
                        cluster,
                    })
                    .collect(),
            );
            info!(clusters = settings.clusters, "Clustered articles");
        }
        Err(e) if e.is_recoverable() => {
            warn!(error = %e, "Skipping clustering and PCA");
            notices.push(format!("clustering skipped: {e}"));
        }
        Err(e) => return Err(e),
    }

    Ok(StageOutcome::from_notices(
        AnalysisBundle {
            metrics,
            word_frequencies,
            clusters,
            coordinates,
        },
        notices,
    ))
}

/// Cluster labels and 2D coordinates for each text.
fn cluster_and_project(
    texts: &[&str],
    settings: &AnalysisSettings,
) -> Result<(Vec<usize>, Vec<(f64, f64)>), PipelineError> {
    let k = settings.clusters;
    if k == 0 || texts.len() < k {
        return Err(PipelineError::InsufficientData {
            samples: texts.len(),
            k,
        });
    }

    let tfidf = TfidfVectorizer::new()
        .with_min_df(settings.min_df)
        .with_max_df(settings.max_df)
        .with_ngram_range(1, 2)
        .fit_transform(texts);
    if tfidf.n_terms() == 0 {
        return Err(PipelineError::EmptyVocabulary);
    }

    let fit = KMeans::new(k)
        .with_n_init(settings.n_init)
        .with_seed(settings.seed)
        .fit(&tfidf.matrix)?;
    let scores = Pca::new(2).fit_transform(&tfidf.matrix);
    let points = scores
        .rows()
        .into_iter()
        .map(|row| (row[0], row[1]))
        .collect();

    Ok((fit.labels, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, text: &str) -> CleanedArticle {
        CleanedArticle {
            url: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            date: None,
            text: text.to_string(),
        }
    }

    fn corpus(n: usize) -> Vec<CleanedArticle> {
        let bodies = [
            "Time blindness makes planning hard and deadlines slip past without warning.",
            "Planning routines with timers helps people who are always late to meetings.",
            "Procrastination is not laziness; the task feels heavy and the delay grows.",
            "A morning routine and a visual calendar reduce the stress of being late.",
            "Breaking a large task into steps makes procrastination easier to overcome.",
        ];
        (0..n)
            .map(|i| article(&format!("Article {i}"), bodies[i % bodies.len()]))
            .collect()
    }

    #[test]
    fn test_two_clusters_over_five_articles() {
        let settings = AnalysisSettings::default();
        let outcome = analyze(&corpus(5), &settings, &Stopwords::default()).unwrap();
        assert!(outcome.is_complete());

        let bundle = outcome.into_data();
        assert_eq!(bundle.metrics.len(), 5);
        assert!(bundle.metrics.iter().all(|m| matches!(m.cluster, Some(c) if c < 2)));
        assert_eq!(bundle.clusters.as_ref().map(Vec::len), Some(5));
        assert_eq!(bundle.coordinates.as_ref().map(Vec::len), Some(5));
        for m in &bundle.metrics {
            assert!((-1.0..=1.0).contains(&m.sentiment_compound));
            assert!(m.word_count > 0);
        }
    }

    #[test]
    fn test_clustering_skipped_with_too_few_articles() {
        let settings = AnalysisSettings {
            clusters: 5,
            ..AnalysisSettings::default()
        };
        let outcome = analyze(&corpus(3), &settings, &Stopwords::default()).unwrap();
        assert!(!outcome.is_complete());
        assert!(outcome.notices()[0].contains("not enough articles"));

        let bundle = outcome.into_data();
        assert_eq!(bundle.metrics.len(), 3);
        assert!(bundle.metrics.iter().all(|m| m.cluster.is_none()));
        assert!(bundle.clusters.is_none());
        assert!(bundle.coordinates.is_none());
        assert!(!bundle.word_frequencies.is_empty());
    }

    #[test]
    fn test_single_article_skips_clustering_on_empty_vocabulary() {
        let settings = AnalysisSettings {
            clusters: 1,
            ..AnalysisSettings::default()
        };
        let outcome = analyze(&corpus(1), &settings, &Stopwords::default()).unwrap();
        assert!(!outcome.is_complete());
        assert!(outcome.notices()[0].contains("vocabulary is empty"));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let settings = AnalysisSettings::default();
        let a = analyze(&corpus(5), &settings, &Stopwords::default())
            .unwrap()
            .into_data();
        let b = analyze(&corpus(5), &settings, &Stopwords::default())
            .unwrap()
            .into_data();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clean_text_and_word_count() {
        let articles = vec![article(
            "Hello",
            "<p>Hello World! This is a test article about time management for people with ADHD who struggle with planning.</p>",
        )];
        let bundle = analyze(&articles, &AnalysisSettings::default(), &Stopwords::default())
            .unwrap()
            .into_data();
        let m = &bundle.metrics[0];
        assert_eq!(m.word_count, 12);
        assert!(m.clean_text.starts_with("hello world this is"));
    }

    #[test]
    fn test_sentiment_scored_on_clean_text() {
        let articles = vec![
            article("Good", "<b>Great</b> routines are really helpful!"),
            article("Bad", "Missing deadlines feels terrible."),
        ];
        let bundle = analyze(&articles, &AnalysisSettings::default(), &Stopwords::default())
            .unwrap()
            .into_data();
        let expected = compute_sentiment(&[
            clean_text(&articles[0].text),
            clean_text(&articles[1].text),
        ]);
        let scores: Vec<f64> = bundle.metrics.iter().map(|m| m.sentiment_compound).collect();
        assert_eq!(scores, expected);
        assert!(scores[0] > 0.0);
        assert!(scores[1] < 0.0);
    }
}
