//! # Analysis Entities

use serde::{Deserialize, Serialize};
use shared_types::{BlockReason, LibraryStatus};
use std::collections::{BTreeMap, BTreeSet};

/// Why an edge's DVN policy differs from the dominant one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DifferenceReason {
    /// Different required DVN count.
    #[serde(rename_all = "camelCase")]
    CountMismatch {
        /// Dominant count.
        expected: Option<u32>,
        /// Edge count.
        actual: Option<u32>,
    },
    /// Different required DVN set.
    ValidatorSetMismatch {
        /// Dominant labels the edge lacks.
        missing: Vec<String>,
        /// Edge labels the dominant lacks.
        extra: Vec<String>,
    },
    /// The edge relies on the optional quorum alone.
    SentinelQuorum,
}

/// Security classification of one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSecurity {
    /// Sending OApp.
    pub from: String,
    /// Receiving OApp.
    pub to: String,
    /// Remote endpoint of the route.
    pub source_endpoint_id: String,
    /// Whether the route cannot deliver.
    pub is_blocked: bool,
    /// Every reason it cannot deliver.
    pub block_reasons: Vec<BlockReason>,
    /// Library status of the route.
    pub library_status: Option<LibraryStatus>,
    /// Required DVN count of the route.
    #[serde(rename = "requiredDVNCount")]
    pub required_dvn_count: Option<u32>,
    /// Sorted lowercase DVN labels.
    #[serde(rename = "requiredDVNLabels")]
    pub required_dvn_labels: Vec<String>,
    /// Whether the route uses the required-DVN sentinel.
    pub uses_sentinel: bool,
    /// Policy fingerprint; absent when the route reports no DVN quorum.
    pub fingerprint: Option<String>,
    /// Whether the policy differs from the dominant one.
    pub differs_from_popular: bool,
    /// How it differs.
    pub difference_reasons: Vec<DifferenceReason>,
    /// Whether the configured peer looks stale.
    pub is_stale_peer: Option<bool>,
}

/// Most common required-DVN policy among healthy routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantCombination {
    /// Policy fingerprint.
    pub fingerprint: String,
    /// Required DVN count.
    #[serde(rename = "requiredDVNCount")]
    pub required_dvn_count: Option<u32>,
    /// Sorted lowercase DVN labels.
    pub normalized_names: Vec<String>,
    /// Edges using it.
    pub count: usize,
    /// `count` over all grouped edges.
    pub share: f64,
    /// Receiving OApps of those edges.
    pub to_nodes: BTreeSet<String>,
    /// Remote endpoints of those edges.
    pub src_endpoint_ids: BTreeSet<String>,
}

/// Headline counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Edges analyzed.
    pub total_edges: usize,
    /// Edges that cannot deliver.
    pub blocked_edges: usize,
    /// Healthy edges off the dominant policy.
    pub differing_edges: usize,
    /// Edges using the sentinel.
    pub sentinel_edges: usize,
    /// Nodes nothing can reach.
    pub blocked_nodes: usize,
    /// Nodes never fetched.
    pub dangling_nodes: usize,
}

/// Analysis of a finished crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAnalysis {
    /// Per-edge classification keyed by `from->to`.
    pub edges: BTreeMap<String, EdgeSecurity>,
    /// Dominant policy, if any healthy fingerprinted edge exists.
    pub dominant: Option<DominantCombination>,
    /// Blocked node ids.
    pub blocked_nodes: BTreeSet<String>,
    /// Counts.
    pub summary: AnalysisSummary,
}

/// Position of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    /// Node id.
    pub id: String,
    /// Column after splitting.
    pub column: usize,
    /// Hops from the center; `None` when unreachable.
    pub distance: Option<usize>,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}
