//! TF-IDF vectorization.
//!
//! Documents are lowercased and split into tokens of two or more word
//! characters; n-grams are joined with a single space. Weights use raw term
//! counts, smoothed inverse document frequency
//!
//! ```text
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! and L2-normalized rows. The vocabulary is sorted alphabetically, so column
//! order is deterministic.

use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Configurable TF-IDF vectorizer.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Keep terms present in at least this many documents.
    min_df: usize,
    /// Drop terms present in more than this share of documents.
    max_df: f64,
    /// Smallest and largest n-gram length.
    ngram_range: (usize, usize),
}

/// Fitted vocabulary and document-term matrix.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Column labels, alphabetical.
    pub vocabulary: Vec<String>,
    /// One L2-normalized row per document.
    pub matrix: Array2<f64>,
}

impl TfidfMatrix {
    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            min_df: 1,
            max_df: 1.0,
            ngram_range: (1, 1),
        }
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n.max(1), max_n.max(min_n.max(1)));
        self
    }

    /// Terms (tokens and n-grams) of one document, in order of appearance.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Learn the vocabulary and idf from `documents` and return their matrix.
    ///
    /// When every term is pruned by the document-frequency limits the
    /// vocabulary is empty and the matrix has zero columns.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfMatrix {
        let n_docs = documents.len();
        let doc_terms: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for term in self.analyze(doc.as_ref()) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &doc_terms {
            for term in counts.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let max_doc_count = self.max_df * n_docs as f64;
        let vocabulary: Vec<String> = doc_freq
            .iter()
            .filter(|&(_, &df)| df >= self.min_df && (df as f64) <= max_doc_count)
            .map(|(term, _)| term.to_string())
            .collect();
        let pruned = doc_freq.len() - vocabulary.len();

        let column: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|t| {
                let df = doc_freq[t.as_str()] as f64;
                ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let mut matrix = Array2::<f64>::zeros((n_docs, vocabulary.len()));
        for (row, counts) in doc_terms.iter().enumerate() {
            for (term, &tf) in counts {
                if let Some(&col) = column.get(term.as_str()) {
                    matrix[[row, col]] = tf as f64 * idf[col];
                }
            }
            let mut r = matrix.row_mut(row);
            let norm = r.dot(&r).sqrt();
            if norm > 0.0 {
                r.mapv_inplace(|x| x / norm);
            }
        }

        debug!(
            documents = n_docs,
            terms = vocabulary.len(),
            pruned,
            "Fitted TF-IDF vocabulary"
        );

        TfidfMatrix {
            vocabulary,
            matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::collections::HashSet;

    #[test]
    fn test_analyze_unigrams_and_bigrams() {
        let v = TfidfVectorizer::new().with_ngram_range(1, 2);
        assert_eq!(
            v.analyze("Time blindness, a real thing"),
            vec![
                "time",
                "blindness",
                "real",
                "thing",
                "time blindness",
                "blindness real",
                "real thing"
            ]
        );
    }

    #[test]
    fn test_analyze_short_document() {
        let v = TfidfVectorizer::new().with_ngram_range(1, 2);
        assert_eq!(v.analyze("focus"), vec!["focus"]);
        assert!(v.analyze("").is_empty());
    }

    #[test]
    fn test_vocabulary_sorted_and_rows_normalized() {
        let docs = ["late late planning", "routine planning", "delay routine"];
        let tfidf = TfidfVectorizer::new().fit_transform(&docs);
        assert_eq!(tfidf.vocabulary, vec!["delay", "late", "planning", "routine"]);
        for row in tfidf.matrix.rows() {
            assert_abs_diff_eq!(row.dot(&row).sqrt(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smooth_idf_values() {
        let docs = ["alpha beta", "alpha gamma"];
        let tfidf = TfidfVectorizer::new().fit_transform(&docs);
        let alpha = tfidf.vocabulary.iter().position(|t| t == "alpha").unwrap();
        let beta = tfidf.vocabulary.iter().position(|t| t == "beta").unwrap();
        // Both terms occur once in the first row, so their weights differ by idf alone.
        let row = tfidf.matrix.row(0);
        assert_abs_diff_eq!(row[beta] / row[alpha], (3.0f64 / 2.0).ln() + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_max_df_prunes_common_terms() {
        let docs = [
            "adhd time plan",
            "adhd time late",
            "adhd time delay",
            "adhd focus routine",
        ];
        let tfidf = TfidfVectorizer::new()
            .with_max_df(0.85)
            .with_ngram_range(1, 2)
            .fit_transform(&docs);
        let terms: HashSet<&str> = tfidf.vocabulary.iter().map(String::as_str).collect();
        // "adhd" is in 4/4 documents, "time" in 3/4 = 0.75.
        assert!(!terms.contains("adhd"));
        assert!(terms.contains("time"));
        assert!(terms.contains("time plan"));
    }

    #[test]
    fn test_single_document_prunes_everything() {
        let tfidf = TfidfVectorizer::new()
            .with_max_df(0.85)
            .fit_transform(&["only one document here"]);
        assert_eq!(tfidf.n_terms(), 0);
        assert_eq!(tfidf.matrix.nrows(), 1);
    }

    #[test]
    fn test_min_df_filters_rare_terms() {
        let docs = ["plan plan late", "plan delay"];
        let tfidf = TfidfVectorizer::new().with_min_df(2).fit_transform(&docs);
        assert_eq!(tfidf.vocabulary, vec!["plan"]);
    }
}
