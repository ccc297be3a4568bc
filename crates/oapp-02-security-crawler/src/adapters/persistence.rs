//! Crawl files: pretty-printed JSON of a [`CrawlResult`].

use std::path::Path;

use shared_types::CrawlResult;
use tracing::info;

use crate::domain::CrawlError;

fn persistence_error(path: &Path, reason: impl ToString) -> CrawlError {
    CrawlError::Persistence {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Write a crawl to `path`, replacing any existing file.
pub async fn save_crawl(path: impl AsRef<Path>, result: &CrawlResult) -> Result<(), CrawlError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(result).map_err(|e| persistence_error(path, e))?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| persistence_error(path, e))?;

    info!(
        "[oapp-02] Saved crawl of {} to {} ({} nodes, {} edges)",
        result.seed,
        path.display(),
        result.nodes.len(),
        result.edges.len()
    );
    Ok(())
}

/// Read a crawl written by [`save_crawl`] (or an older file without
/// `failures`).
pub async fn load_crawl(path: impl AsRef<Path>) -> Result<CrawlResult, CrawlError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| persistence_error(path, e))?;
    serde_json::from_str(&text).map_err(|e| persistence_error(path, e))
}
