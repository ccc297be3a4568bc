//! # Domain Value Objects

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle shared between a crawl and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// New, not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-call crawl options.
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Requested depth; the configured default when `None`.
    pub depth: Option<u32>,
    /// Cancellation handle.
    pub cancel: Option<CancelFlag>,
}

impl CrawlOptions {
    /// Options with an explicit depth.
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth: Some(depth),
            cancel: None,
        }
    }

    /// Attach a cancellation handle.
    #[must_use]
    pub fn cancellable(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

/// An OApp running on the chain default config, with its traffic rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedOApp {
    /// OApp id.
    pub oapp_id: String,
    /// Position in descending packet order; `None` when the OApp has no
    /// traffic record.
    pub rank: Option<usize>,
    /// Packets received.
    pub total_packets_received: u64,
}
