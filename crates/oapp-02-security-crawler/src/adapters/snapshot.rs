//! Offline loader over a JSON snapshot of the indexer.
//!
//! The snapshot file is a serialized [`ConfigBatch`] covering many OApps;
//! each fetch returns the subset for the requested ids.

use std::path::Path;

use async_trait::async_trait;
use shared_types::ConfigBatch;
use tracing::info;

use crate::algorithms::rank_batch_default_config;
use crate::domain::{LoaderError, RankedOApp};
use crate::ports::{ConfigBatchLoader, DefaultConfigDirectory};

/// Loader serving batches from an in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBatchLoader {
    snapshot: ConfigBatch,
}

impl SnapshotBatchLoader {
    /// Serve `snapshot`.
    pub fn new(snapshot: ConfigBatch) -> Self {
        Self { snapshot }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LoaderError> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|e| LoaderError::Snapshot(format!("invalid snapshot: {}", e)))
    }

    /// Read a snapshot file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoaderError::Snapshot(format!("{}: {}", path.display(), e)))?;
        let loader = Self::from_json(&text)?;
        info!(
            "[oapp-02] Loaded snapshot {} ({} OApps)",
            path.display(),
            loader.snapshot.oapps.len()
        );
        Ok(loader)
    }

    /// Underlying snapshot.
    pub fn snapshot(&self) -> &ConfigBatch {
        &self.snapshot
    }
}

#[async_trait]
impl ConfigBatchLoader for SnapshotBatchLoader {
    async fn fetch_batch(&self, oapp_ids: &[String]) -> Result<ConfigBatch, LoaderError> {
        Ok(self.snapshot.subset(oapp_ids))
    }
}

#[async_trait]
impl DefaultConfigDirectory for SnapshotBatchLoader {
    async fn default_config_oapps(&self, limit: usize) -> Result<Vec<RankedOApp>, LoaderError> {
        Ok(rank_batch_default_config(&self.snapshot, limit))
    }
}
