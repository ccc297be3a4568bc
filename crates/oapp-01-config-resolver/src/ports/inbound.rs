//! # Inbound Ports
//!
//! API trait defining what the resolver can do.

use crate::domain::{ResolveInput, ResolvedSecurity};

/// Route resolver - inbound port.
pub trait RouteResolver: Send + Sync {
    /// Resolve the effective security config of every inbound route of one
    /// OApp. Never fails: bad candidates are skipped, bad peers degrade.
    fn resolve(&self, input: &ResolveInput<'_>) -> ResolvedSecurity;
}
