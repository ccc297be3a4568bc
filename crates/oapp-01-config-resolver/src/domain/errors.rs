//! # Domain Errors
//!
//! Resolution never fails as a whole: these errors only decide whether a
//! single candidate route is skipped, and are logged at debug level.

use thiserror::Error;

/// Per-candidate resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// Candidate endpoint id is empty or not decimal.
    #[error("Invalid candidate endpoint id: {0:?}")]
    InvalidEndpointId(String),
}
