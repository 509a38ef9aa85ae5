//! Generic article page scraper.
//!
//! Works on ordinary editorial pages: the title comes from `<title>`, the
//! date from the first `<time>` element, and the body from the paragraphs of
//! the `<article>` container, falling back to `<main>` and then the whole
//! document.
//!
//! Fetching is strictly sequential. A failed URL is logged and skipped; it
//! never aborts the batch.

use crate::config::FetchSettings;
use crate::error::{FetchError, PipelineError};
use crate::models::{ArticleRecord, StageOutcome};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, instrument};

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static TIME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Build the HTTP client used for every article request.
///
/// The client carries the browser-like `User-Agent` and the per-request
/// timeout from `settings`.
pub fn http_client(settings: &FetchSettings) -> Result<Client, PipelineError> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .build()
        .map_err(PipelineError::Client)
}

/// Fetch every URL in order, skipping the ones that fail.
///
/// # Returns
///
/// [`StageOutcome::Complete`] when every URL was scraped, otherwise
/// [`StageOutcome::Partial`] with one notice per failed URL. Successful
/// records keep the order of `urls`.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn collect(client: &Client, urls: &[String]) -> StageOutcome<Vec<ArticleRecord>> {
    let results: Vec<(&String, Result<ArticleRecord, FetchError>)> = stream::iter(urls)
        .then(|url| async move { (url, fetch_article(client, url).await) })
        .collect()
        .await;

    let mut articles = Vec::with_capacity(results.len());
    let mut notices = Vec::new();
    for (url, result) in results {
        match result {
            Ok(article) => {
                info!(%url, "Scraped article");
                articles.push(article);
            }
            Err(e) => {
                error!(%url, error = %e, "Failed to scrape article; skipping");
                notices.push(format!("skipped {url}: {e}"));
            }
        }
    }

    info!(
        fetched = articles.len(),
        failed = notices.len(),
        "Finished collecting articles"
    );
    StageOutcome::from_notices(articles, notices)
}

/// Fetch and parse a single article.
///
/// # Errors
///
/// - [`FetchError::Timeout`] when the request exceeds the client timeout
/// - [`FetchError::Status`] on a non-2xx response
/// - [`FetchError::Transport`] on any other network or decoding failure
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_article(client: &Client, url: &str) -> Result<ArticleRecord, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?
        .error_for_status()
        .map_err(|e| FetchError::from_reqwest(url, e))?;
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let article = parse_article(url, &body);
    debug!(
        bytes = body.len(),
        text_chars = article.text.chars().count(),
        has_date = article.date.is_some(),
        "Parsed article"
    );
    Ok(article)
}

/// Extract title, date and body text from an article page.
pub fn parse_article(url: &str, html: &str) -> ArticleRecord {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.to_string());

    let date = document.select(&TIME_SELECTOR).next().and_then(|time| {
        time.value()
            .attr("datetime")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .or_else(|| {
                let visible = time.text().collect::<String>().trim().to_string();
                (!visible.is_empty()).then_some(visible)
            })
    });

    // First container holding any non-empty paragraph wins.
    let text = document
        .select(&ARTICLE_SELECTOR)
        .next()
        .into_iter()
        .chain(document.select(&MAIN_SELECTOR).next())
        .chain(std::iter::once(document.root_element()))
        .map(paragraphs)
        .find(|ps| !ps.is_empty())
        .unwrap_or_default()
        .join("\n\n");

    ArticleRecord {
        url: url.to_string(),
        title,
        date,
        text,
    }
}

fn paragraphs(container: ElementRef<'_>) -> Vec<String> {
    container
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
