//! # Error Types
//!
//! Defines error types shared by the resolver, crawler and analyzer.

use thiserror::Error;

/// Errors raised while normalizing an on-chain address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input is empty or contains non-hex characters.
    #[error("Malformed address: {0:?}")]
    Malformed(String),

    /// Input is hex but cannot be expressed as a 20-byte address
    /// (too long, or a bytes32 value with non-zero upper bytes).
    #[error("Unresolvable address: {0:?}")]
    Unresolvable(String),
}

/// Errors raised while parsing an OApp identifier (`<eid>_<address>`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// No underscore separator in the identifier.
    #[error("Malformed identifier {0:?}: expected <endpointId>_<address>")]
    MissingSeparator(String),

    /// Endpoint id part is empty or not a decimal number.
    #[error("Malformed endpoint id {eid:?} in {id:?}")]
    InvalidEndpointId {
        /// Full identifier text
        id: String,
        /// Endpoint id part
        eid: String,
    },

    /// Address part failed normalization.
    #[error("Malformed address in {id:?}: {source}")]
    InvalidAddress {
        /// Full identifier text
        id: String,
        /// Underlying address error
        #[source]
        source: AddressError,
    },
}

/// Errors raised while loading explorer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected layout.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
