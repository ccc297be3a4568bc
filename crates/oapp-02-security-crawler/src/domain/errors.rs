//! # Domain Errors
//!
//! Loader errors stay at the boundary; the crawler wraps them with the id
//! whose fetch failed.

use shared_types::IdentifierError;
use thiserror::Error;

/// Errors raised by a [`ConfigBatchLoader`](crate::ports::ConfigBatchLoader).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// Transport failure or non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The GraphQL endpoint answered with errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A snapshot could not be read or has no such data.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// Crawl errors.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed is not a valid OApp id.
    #[error("Malformed OApp id: {0}")]
    MalformedIdentifier(#[from] IdentifierError),

    /// The seed fetch failed, or any fetch under fail-fast.
    #[error("Upstream fetch failed for {oapp_id}: {source}")]
    UpstreamFetch {
        /// OApp whose batch could not be fetched.
        oapp_id: String,
        /// Loader error.
        #[source]
        source: LoaderError,
    },

    /// The crawl was cancelled between two nodes.
    #[error("Crawl cancelled after {processed} nodes")]
    Cancelled {
        /// Nodes fully processed before cancellation.
        processed: usize,
    },

    /// Saving or loading a crawl file failed.
    #[error("Crawl persistence failed for {path}: {reason}")]
    Persistence {
        /// File path.
        path: String,
        /// Underlying error text.
        reason: String,
    },
}
