//! # OApp-02 Security Crawler
//!
//! Breadth-first crawl of the OApp peer topology around a seed.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Starting from one OApp, follow every configured peer, resolve each
//! visited OApp's inbound routes (Subsystem 01) and assemble a graph whose
//! edges point from the sending peer to the receiving OApp.
//!
//! ## Guarantees
//!
//! | Property | How |
//! |----------|-----|
//! | Termination | depth bound plus visited/pending sets |
//! | Completeness | every edge endpoint is a node (dangling if never fetched) |
//! | Honest partial results | failed fetches are listed in `failures` |
//! | Clean cancellation | checked between nodes, nothing half-applied |
//!
//! ## Module Structure
//!
//! ```text
//! oapp-02-security-crawler/
//! ├── domain/          # CrawlOptions, CancelFlag, errors
//! ├── algorithms/      # edge build/merge, stale peers, default-config ranking
//! ├── ports/           # SecurityCrawlApi, ConfigBatchLoader, DefaultConfigDirectory
//! ├── adapters/        # snapshot, GraphQL (feature "http"), crawl files
//! └── service.rs       # SecurityCrawler
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
#[cfg(feature = "http")]
pub use adapters::GraphqlBatchLoader;
pub use adapters::{load_crawl, save_crawl, SnapshotBatchLoader};
pub use algorithms::{
    block_reason_hint, build_edge, is_stale_peer, merge_edge, rank_batch_default_config,
    rank_default_config_oapps, route_activity,
};
pub use domain::{CancelFlag, CrawlError, CrawlOptions, LoaderError, RankedOApp};
pub use ports::{ConfigBatchLoader, DefaultConfigDirectory, MockBatchLoader, SecurityCrawlApi};
pub use service::SecurityCrawler;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
