//! # Outbound Ports
//!
//! Traits for the upstream indexer.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::ConfigBatch;
use std::collections::BTreeSet;

use crate::algorithms::rank_batch_default_config;
use crate::domain::{CancelFlag, LoaderError, RankedOApp};

/// Config batch loader - outbound port.
///
/// Returns every row the resolver needs for the requested OApps. Unknown ids
/// yield empty collections, not errors.
#[async_trait]
pub trait ConfigBatchLoader: Send + Sync {
    /// Fetch the batch for `oapp_ids` (normalized OApp ids).
    async fn fetch_batch(&self, oapp_ids: &[String]) -> Result<ConfigBatch, LoaderError>;
}

/// Directory of OApps running on the chain default config - outbound port.
#[async_trait]
pub trait DefaultConfigDirectory: Send + Sync {
    /// Default-config OApps, busiest first, at most `limit`.
    async fn default_config_oapps(&self, limit: usize) -> Result<Vec<RankedOApp>, LoaderError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock loader serving a fixed batch, with failure injection.
#[derive(Default)]
pub struct MockBatchLoader {
    /// Rows served (restricted to the requested ids).
    pub batch: ConfigBatch,
    /// Ids whose fetch fails.
    pub failing: BTreeSet<String>,
    /// Cancel this flag once the given number of fetches happened.
    pub cancel_after: Option<(usize, CancelFlag)>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockBatchLoader {
    /// Serve `batch`.
    pub fn new(batch: ConfigBatch) -> Self {
        Self {
            batch,
            ..Default::default()
        }
    }

    /// Make fetches of `oapp_id` fail.
    #[must_use]
    pub fn failing_on(mut self, oapp_id: &str) -> Self {
        self.failing.insert(oapp_id.to_string());
        self
    }

    /// Cancel `flag` after `fetches` fetches.
    #[must_use]
    pub fn cancelling_after(mut self, fetches: usize, flag: CancelFlag) -> Self {
        self.cancel_after = Some((fetches, flag));
        self
    }

    /// Requested id lists, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ConfigBatchLoader for MockBatchLoader {
    async fn fetch_batch(&self, oapp_ids: &[String]) -> Result<ConfigBatch, LoaderError> {
        let fetches = {
            let mut calls = self.calls.lock();
            calls.push(oapp_ids.to_vec());
            calls.len()
        };

        if let Some((after, flag)) = &self.cancel_after {
            if fetches >= *after {
                flag.cancel();
            }
        }

        if let Some(id) = oapp_ids.iter().find(|id| self.failing.contains(*id)) {
            return Err(LoaderError::Http(format!("Mock failure for {}", id)));
        }

        Ok(self.batch.subset(oapp_ids))
    }
}

#[async_trait]
impl DefaultConfigDirectory for MockBatchLoader {
    async fn default_config_oapps(&self, limit: usize) -> Result<Vec<RankedOApp>, LoaderError> {
        Ok(rank_batch_default_config(&self.batch, limit))
    }
}
