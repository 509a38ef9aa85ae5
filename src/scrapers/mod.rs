//! Article collection.
//!
//! The collector walks a fixed list of article URLs and turns each page into
//! an [`ArticleRecord`](crate::models::ArticleRecord):
//!
//! 1. **Fetching**: `GET` with a browser-like `User-Agent` and a timeout
//! 2. **Parsing**: title, first `<time>` date, and paragraph text
//!
//! Failed URLs are logged and skipped without failing the batch.
//!
//! # Exports
//!
//! - [`article::http_client`]: build the shared client
//! - [`article::fetch_article`]: fetch and parse one URL
//! - [`article::parse_article`]: parse already-downloaded HTML
//! - [`article::collect`]: sequential skip-on-failure loop over many URLs

pub mod article;
