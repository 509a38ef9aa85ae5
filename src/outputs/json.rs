//! Raw record file (JSON).
//!
//! The collector's output is a single pretty-printed document:
//!
//! ```text
//! {
//!   "articles": [ { "url": ..., "title": ..., "date": ..., "text": ... } ],
//!   "collected_at": "2025-05-06T08:00:00Z"
//! }
//! ```

use super::RAW_FILE;
use crate::error::PipelineError;
use crate::models::RawCollection;
use crate::utils::looks_truncated;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`RawCollection`] to `{out_dir}/collected_raw.json`.
///
/// The directory is created if needed and any previous file is replaced.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display(), articles = collection.articles.len()))]
pub async fn write_raw(collection: &RawCollection, out_dir: &Path) -> Result<PathBuf, PipelineError> {
    let json = serde_json::to_string_pretty(collection)?;

    if let Err(e) = fs::create_dir_all(out_dir).await {
        error!(error = %e, "Failed to create raw output dir");
        return Err(PipelineError::io(out_dir, e));
    }

    let path = out_dir.join(RAW_FILE);
    fs::write(&path, json)
        .await
        .map_err(|e| PipelineError::io(&path, e))?;
    info!(path = %path.display(), "Wrote raw records");

    Ok(path)
}

/// Read a raw record file written by [`write_raw`].
///
/// # Errors
///
/// [`PipelineError::Io`] if the file cannot be read, [`PipelineError::Json`]
/// if it is not a valid record document.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_raw(path: &Path) -> Result<RawCollection, PipelineError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| PipelineError::io(path, e))?;
    match serde_json::from_slice::<RawCollection>(&bytes) {
        Ok(collection) => Ok(collection),
        Err(e) => {
            if looks_truncated(&e) {
                error!(error = %e, "Raw record file ends early; was the collect run interrupted?");
            } else {
                error!(error = %e, "Raw record file is not valid JSON");
            }
            Err(e.into())
        }
    }
}
