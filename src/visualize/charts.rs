//! Chart rendering with `plotters`' SVG backend.
//!
//! Each `plot_*` function reads one analysis table, renders one figure and
//! reports whether it was drawn. Drawing errors surface as
//! [`PipelineError::Render`].

use super::{ChartOutcome, LABEL_CHARS, count_keywords};
use crate::error::PipelineError;
use crate::models::{ArticleMetrics, PcaCoordinate, WordFrequency};
use crate::outputs::tables::{read_coordinates, read_metrics, read_word_freqs};
use crate::utils::truncate_chars;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

const FONT: &str = "sans-serif";
const NEUTRAL: RGBColor = RGBColor(150, 150, 150);

fn render_error(path: &Path, e: Box<dyn Error>) -> PipelineError {
    PipelineError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn skipped(out: &Path, reason: String) -> ChartOutcome {
    warn!(path = %out.display(), %reason, "Chart skipped");
    ChartOutcome::Skipped(reason)
}

fn rendered(out: &Path) -> ChartOutcome {
    info!(path = %out.display(), "Rendered chart");
    ChartOutcome::Rendered(out.to_path_buf())
}

/// Label for the category at axis position `value`, if it sits on one.
fn index_label(value: f64, labels: &[String]) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Horizontal bar chart of the most frequent words, most frequent on top.
#[instrument(level = "info", skip_all, fields(input = %word_freq_csv.display()))]
pub fn plot_top_words(word_freq_csv: &Path, out: &Path, top_n: usize) -> Result<ChartOutcome, PipelineError> {
    let freqs: Vec<WordFrequency> = read_word_freqs(word_freq_csv)?
        .into_iter()
        .take(top_n)
        .collect();
    if freqs.is_empty() {
        return Ok(skipped(out, "no word frequencies to plot".to_string()));
    }
    draw_top_words(out, &freqs).map_err(|e| render_error(out, e))?;
    Ok(rendered(out))
}

fn draw_top_words(out: &Path, freqs: &[WordFrequency]) -> Result<(), Box<dyn Error>> {
    // Bottom-up drawing order puts the most frequent word at the top.
    let rows: Vec<&WordFrequency> = freqs.iter().rev().collect();
    let labels: Vec<String> = rows.iter().map(|w| w.word.clone()).collect();
    let n = rows.len();
    let max = rows.iter().map(|w| w.count).max().unwrap_or(1) as f64;

    let root = SVGBackend::new(out, (900, 120 + 28 * n as u32)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Top {n} words"), (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(140)
        .build_cartesian_2d(0f64..max * 1.05, -0.5f64..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|y| index_label(*y, &labels))
        .x_desc("Count")
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(i, w)| {
        let y = i as f64;
        Rectangle::new([(0.0, y - 0.35), (w.count as f64, y + 0.35)], BLUE.mix(0.8).filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Horizontal bars of compound sentiment per article, sorted ascending.
///
/// Negative scores are red, positive green, exact zeros grey.
#[instrument(level = "info", skip_all, fields(input = %metrics_csv.display()))]
pub fn plot_sentiment(metrics_csv: &Path, out: &Path) -> Result<ChartOutcome, PipelineError> {
    let mut metrics = read_metrics(metrics_csv)?;
    if metrics.is_empty() {
        return Ok(skipped(out, "no articles to plot sentiment for".to_string()));
    }
    metrics.sort_by(|a, b| a.sentiment_compound.total_cmp(&b.sentiment_compound));
    draw_sentiment(out, &metrics).map_err(|e| render_error(out, e))?;
    Ok(rendered(out))
}

fn draw_sentiment(out: &Path, metrics: &[ArticleMetrics]) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = metrics
        .iter()
        .map(|m| truncate_chars(&m.title, LABEL_CHARS))
        .collect();
    let n = metrics.len();

    let root = SVGBackend::new(out, (1100, 140 + 36 * n as u32)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Sentiment by article", (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(420)
        .build_cartesian_2d(-1f64..1f64, -0.5f64..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|y| index_label(*y, &labels))
        .x_desc("Compound sentiment")
        .draw()?;

    chart.draw_series(metrics.iter().enumerate().map(|(i, m)| {
        let y = i as f64;
        let s = m.sentiment_compound;
        let color = if s < 0.0 {
            RED.to_rgba()
        } else if s > 0.0 {
            GREEN.to_rgba()
        } else {
            NEUTRAL.to_rgba()
        };
        Rectangle::new([(0.0, y - 0.35), (s, y + 0.35)], color.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Grouped bars: for each keyword, one bar per article.
#[instrument(level = "info", skip_all, fields(input = %metrics_csv.display(), keywords = keywords.len()))]
pub fn plot_keyword_counts(
    metrics_csv: &Path,
    keywords: &[String],
    out: &Path,
) -> Result<ChartOutcome, PipelineError> {
    let metrics = read_metrics(metrics_csv)?;
    if metrics.is_empty() || keywords.is_empty() {
        return Ok(skipped(out, "no articles or keywords to count".to_string()));
    }
    let counts: Vec<Vec<usize>> = metrics
        .iter()
        .map(|m| count_keywords(&m.clean_text, keywords))
        .collect();
    draw_keyword_counts(out, &metrics, keywords, &counts).map_err(|e| render_error(out, e))?;
    Ok(rendered(out))
}

fn draw_keyword_counts(
    out: &Path,
    metrics: &[ArticleMetrics],
    keywords: &[String],
    counts: &[Vec<usize>],
) -> Result<(), Box<dyn Error>> {
    let n_kw = keywords.len();
    let n_articles = metrics.len();
    let max = counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
    let width = 0.8 / n_articles as f64;

    let root = SVGBackend::new(out, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Keyword mentions per article", (FONT, 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n_kw as f64 - 0.5), 0f64..max * 1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_kw)
        .x_label_formatter(&|x| index_label(*x, keywords))
        .y_desc("Occurrences")
        .draw()?;

    for (j, m) in metrics.iter().enumerate() {
        let color = Palette99::pick(j).to_rgba();
        let offset = -0.4 + width * j as f64;
        chart
            .draw_series(counts[j].iter().enumerate().map(|(k, &c)| {
                let x0 = k as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + width, c as f64)], color.filled())
            }))?
            .label(truncate_chars(&m.title, LABEL_CHARS))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 11))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Scatter of the 2D projection, coloured by cluster and labelled by title.
///
/// A missing coordinates file means clustering was skipped; the chart is
/// skipped too.
#[instrument(level = "info", skip_all, fields(input = %coords_csv.display()))]
pub fn plot_pca_scatter(coords_csv: &Path, out: &Path) -> Result<ChartOutcome, PipelineError> {
    if !coords_csv.exists() {
        return Ok(skipped(
            out,
            format!("{} not found; clustering was skipped", coords_csv.display()),
        ));
    }
    let coords = read_coordinates(coords_csv)?;
    if coords.is_empty() {
        return Ok(skipped(out, "no projected articles to plot".to_string()));
    }
    draw_pca_scatter(out, &coords).map_err(|e| render_error(out, e))?;
    Ok(rendered(out))
}

fn padded_range(values: impl Iterator<Item = f64> + Clone) -> std::ops::Range<f64> {
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.15).max(0.1);
    (min - pad)..(max + pad)
}

fn draw_pca_scatter(out: &Path, coords: &[PcaCoordinate]) -> Result<(), Box<dyn Error>> {
    let x_range = padded_range(coords.iter().map(|c| c.x));
    let y_range = padded_range(coords.iter().map(|c| c.y));

    let root = SVGBackend::new(out, (1100, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Articles by TF-IDF projection", (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("PC1")
        .y_desc("PC2")
        .draw()?;

    chart.draw_series(coords.iter().map(|c| {
        let color = Palette99::pick(c.cluster).to_rgba();
        EmptyElement::at((c.x, c.y))
            + Circle::new((0, 0), 6, color.filled())
            + Text::new(
                truncate_chars(&c.title, LABEL_CHARS),
                (8, -4),
                (FONT, 11).into_font(),
            )
    }))?;

    root.present()?;
    Ok(())
}
