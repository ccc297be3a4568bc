//! # Domain Errors

use thiserror::Error;

/// Layout errors. Analysis itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The requested center is not a node of the graph.
    #[error("Center node {0} is not in the graph")]
    UnknownCenter(String),
}
