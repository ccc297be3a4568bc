//! # Adapters
//!
//! Loader implementations and crawl file persistence.

#[cfg(feature = "http")]
pub mod graphql;
pub mod persistence;
pub mod snapshot;

#[cfg(feature = "http")]
pub use graphql::GraphqlBatchLoader;
pub use persistence::{load_crawl, save_crawl};
pub use snapshot::SnapshotBatchLoader;
