//! Small helpers for labels, JSON diagnostics and output directories.

use crate::error::PipelineError;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate `s` to at most `max` characters, marking the cut with `…`.
///
/// Counts characters, not bytes, so multi-byte titles never split inside a
/// code point. The ellipsis is included in the `max` budget.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("short", 60), "short");
/// assert_eq!(truncate_chars("abcdef", 4), "abc…");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// A raw record file cut short by an interrupted collect run fails with an
/// EOF error; callers use this to point at the cause.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// [`PipelineError::Io`] if the directory cannot be created or written to.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| PipelineError::io(path, e))?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(PipelineError::io(path, e)),
    }
}
