//! # OApp-01 Security Config Resolver
//!
//! Effective per-route security policy of one OApp.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (domain / algorithms / ports / service)
//!
//! ## Purpose
//!
//! An OApp receives messages from many remote endpoints. For each route the
//! resolver answers: which receive library verifies it, which DVNs must
//! attest, how many confirmations are awaited, and whether the configured
//! peer lets anything through at all.
//!
//! ## Layering Rules
//!
//! | Field group    | Rule |
//! |----------------|------|
//! | Library        | Non-zero override, else non-zero default |
//! | DVN parameters | Override in full if it sets anything, else default in full |
//! | Confirmations  | Per field, zero means inherit |
//! | Peer           | Recomputed on every call, stored hints ignored |
//!
//! ## Module Structure
//!
//! ```text
//! oapp-01-config-resolver/
//! ├── domain/          # ResolveInput, ResolvedSecurity, errors
//! ├── algorithms/      # library, ULN and peer layering
//! ├── ports/           # RouteResolver
//! └── service.rs       # SecurityConfigResolver
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::{
    effective_library, interpret_peer, layer_uln, library_status, EffectiveLibrary, EffectiveUln,
    PeerInterpretation,
};
pub use domain::{ResolutionSummary, ResolveInput, ResolvedSecurity, ResolverError};
pub use ports::RouteResolver;
pub use service::{summarize, SecurityConfigResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
