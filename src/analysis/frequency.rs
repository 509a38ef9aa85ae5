//! Corpus-wide word frequencies.

use crate::models::WordFrequency;
use crate::text::{Stopwords, tokenize};
use itertools::Itertools;
use std::collections::HashMap;

/// Rows exported to `word_frequency.csv`.
pub const EXPORT_TOP_N: usize = 200;
/// Bars drawn in the top words chart.
pub const CHART_TOP_N: usize = 20;

/// Count tokens across all `texts` and return the `top_n` most common.
///
/// The result is sorted by descending count. Words with equal counts keep
/// the order in which they were first encountered, scanning texts in order
/// and tokens left to right.
pub fn compute_word_freqs<S: AsRef<str>>(
    texts: &[S],
    top_n: usize,
    stopwords: &Stopwords,
) -> Vec<WordFrequency> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<WordFrequency> = Vec::new();

    for text in texts {
        for token in tokenize(text.as_ref(), stopwords) {
            match index.get(&token) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(token.clone(), counts.len());
                    counts.push(WordFrequency {
                        word: token,
                        count: 1,
                    });
                }
            }
        }
    }

    // `sorted_by` is stable, which preserves first-encountered order on ties.
    counts
        .into_iter()
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .take(top_n)
        .collect()
}
