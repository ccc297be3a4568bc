//! # Edge Classification
//!
//! An edge is blocked when its peer is blocked, a required DVN is a dead
//! marker, or the route has no receive library. Routes judged against the
//! dominant policy must be healthy and report a DVN quorum.

use shared_types::{
    is_dead_address, AnalyzerConfig, BlockReason, GraphEdge, LibraryStatus, SecurityConfigEntry,
    SourceType,
};

use crate::algorithms::fingerprint::{dvn_label, dvn_labels, fingerprint};
use crate::domain::{DifferenceReason, DominantCombination, EdgeSecurity};

fn is_dead_dvn(address: &str, label: &str, markers: &[String]) -> bool {
    is_dead_address(address)
        || markers
            .iter()
            .any(|m| !m.is_empty() && label.contains(&m.to_lowercase()))
}

/// Classify one edge given the receiving node's config for the route.
///
/// `differs_from_popular` is left false; see [`compare_to_dominant`].
pub fn classify_edge(
    edge: &GraphEdge,
    route: Option<&SecurityConfigEntry>,
    config: &AnalyzerConfig,
) -> EdgeSecurity {
    let mut reasons = Vec::new();

    let hint = route.map(|r| r.peer_state_hint).or(edge.peer_state_hint);
    if let Some(reason) = hint.and_then(BlockReason::from_peer_hint) {
        reasons.push(reason);
    }

    let library_status = route.map(|r| r.library_status).or(edge.library_status);
    if library_status == Some(LibraryStatus::Absent) {
        reasons.push(BlockReason::NoLibrary);
    }

    let (required_dvn_count, labels, uses_sentinel) = match route {
        Some(r) => (
            r.required_dvn_count,
            dvn_labels(&r.required_dvns, &config.dvn_aliases),
            r.uses_required_dvn_sentinel || r.has_sentinel_count(),
        ),
        None => (None, Vec::new(), false),
    };

    if let Some(r) = route {
        let dead = r.required_dvns.iter().any(|dvn| {
            let label = dvn_label(dvn, &config.dvn_aliases);
            is_dead_dvn(dvn, &label, &config.dead_dvn_markers)
        });
        if dead {
            reasons.push(BlockReason::DeadDvn);
        }
    }

    reasons.sort();
    reasons.dedup();

    let fingerprint = route
        .filter(|r| reports_quorum(r))
        .map(|_| fingerprint(required_dvn_count, &labels, uses_sentinel));

    EdgeSecurity {
        from: edge.from.clone(),
        to: edge.to.clone(),
        source_endpoint_id: edge.source_endpoint_id.clone(),
        is_blocked: !reasons.is_empty(),
        block_reasons: reasons,
        library_status,
        required_dvn_count,
        required_dvn_labels: labels,
        uses_sentinel,
        fingerprint,
        differs_from_popular: false,
        difference_reasons: Vec::new(),
        is_stale_peer: edge.is_stale_peer,
    }
}

/// Whether the route carries DVN parameters worth comparing. The indexer
/// reports them on materialized rows even without a library status; derived
/// rows only have them under the tracked library.
fn reports_quorum(route: &SecurityConfigEntry) -> bool {
    match route.library_status {
        LibraryStatus::Tracked => true,
        LibraryStatus::Unknown => route.source_type == SourceType::Materialized,
        LibraryStatus::Unsupported | LibraryStatus::Absent => false,
    }
}

/// Mark `edge` as differing from `dominant` when it is healthy, has a
/// fingerprint and the fingerprints differ.
pub fn compare_to_dominant(edge: &mut EdgeSecurity, dominant: &DominantCombination) {
    let Some(fp) = edge.fingerprint.as_deref() else {
        return;
    };
    if edge.is_blocked || fp == dominant.fingerprint {
        return;
    }

    let mut reasons = Vec::new();
    if edge.required_dvn_count != dominant.required_dvn_count {
        reasons.push(DifferenceReason::CountMismatch {
            expected: dominant.required_dvn_count,
            actual: edge.required_dvn_count,
        });
    }

    let missing: Vec<String> = dominant
        .normalized_names
        .iter()
        .filter(|name| !edge.required_dvn_labels.contains(name))
        .cloned()
        .collect();
    let extra: Vec<String> = edge
        .required_dvn_labels
        .iter()
        .filter(|name| !dominant.normalized_names.contains(name))
        .cloned()
        .collect();
    if !missing.is_empty() || !extra.is_empty() {
        reasons.push(DifferenceReason::ValidatorSetMismatch { missing, extra });
    }

    if edge.uses_sentinel {
        reasons.push(DifferenceReason::SentinelQuorum);
    }

    edge.differs_from_popular = true;
    edge.difference_reasons = reasons;
}
