//! Cleaning of raw scraped records.
//!
//! Raw records are normalized with [`normalize_markup`] and then filtered:
//! an article whose cleaned text is shorter than the minimum length almost
//! always means the scraper picked up a cookie banner or an empty shell
//! instead of the story, so the record is dropped.

use crate::models::{ArticleRecord, CleanedArticle};
use crate::text::normalize_markup;
use tracing::{info, instrument, warn};

/// Minimum number of characters a cleaned article must keep.
pub const MIN_TEXT_CHARS: usize = 100;

/// Normalize records and discard those with too little text.
///
/// `url` and `date` are copied verbatim; `title` and `text` go through
/// [`normalize_markup`]. Length is measured in characters, not bytes.
/// Output order follows input order minus discards.
#[instrument(level = "info", skip_all, fields(records = records.len(), min_chars = min_chars))]
pub fn clean(records: &[ArticleRecord], min_chars: usize) -> Vec<CleanedArticle> {
    let cleaned: Vec<CleanedArticle> = records
        .iter()
        .filter_map(|record| {
            let text = normalize_markup(&record.text);
            let chars = text.chars().count();
            if chars < min_chars {
                warn!(url = %record.url, chars, "Discarding short article");
                return None;
            }
            Some(CleanedArticle {
                url: record.url.clone(),
                title: normalize_markup(&record.title),
                date: record.date.clone(),
                text,
            })
        })
        .collect();

    info!(
        kept = cleaned.len(),
        discarded = records.len() - cleaned.len(),
        "Cleaned articles"
    );
    cleaned
}
