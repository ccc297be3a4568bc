//! # Graph Records
//!
//! Nodes, edges and the crawl result. The crawl result is also the persisted
//! file format, so field names are part of a compatibility surface.

use crate::entities::{BlockReason, LibraryStatus, PeerStateHint, SecurityConfigEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Depth recorded on nodes that were never crawled.
pub const DANGLING_DEPTH: i32 = -1;

/// An OApp in the delivery graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// OApp id text.
    pub id: String,
    /// Endpoint id of the OApp.
    pub local_endpoint_id: String,
    /// Normalized address.
    pub address: String,
    /// Packets received, as reported by the indexer.
    #[serde(default)]
    pub total_packets_received: u64,
    /// Whether the indexer knows this OApp.
    #[serde(default)]
    pub is_tracked: bool,
    /// Referenced by an edge but never crawled.
    #[serde(default)]
    pub is_dangling: bool,
    /// BFS depth, or [`DANGLING_DEPTH`].
    pub depth: i32,
    /// Resolved inbound routes.
    #[serde(default)]
    pub security_configs: Vec<SecurityConfigEntry>,
}

impl GraphNode {
    /// Minimal node for an edge endpoint that was never crawled.
    pub fn dangling(id: &str, local_endpoint_id: &str, address: &str) -> Self {
        Self {
            id: id.to_string(),
            local_endpoint_id: local_endpoint_id.to_string(),
            address: address.to_string(),
            total_packets_received: 0,
            is_tracked: false,
            is_dangling: true,
            depth: DANGLING_DEPTH,
            security_configs: Vec::new(),
        }
    }

    /// Route config for a remote endpoint.
    pub fn config_for(&self, source_endpoint_id: &str) -> Option<&SecurityConfigEntry> {
        self.security_configs
            .iter()
            .find(|c| c.source_endpoint_id == source_endpoint_id)
    }
}

/// A configured delivery route `from` (sender peer) → `to` (receiver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Sending OApp id.
    pub from: String,
    /// Receiving OApp id.
    pub to: String,
    /// Endpoint id of the sender.
    pub source_endpoint_id: String,
    /// Receiver's interpretation of the peer.
    pub peer_state_hint: Option<PeerStateHint>,
    /// First reason the route is blocked, if known at crawl time.
    pub block_reason_hint: Option<BlockReason>,
    /// Receiver trusts a peer that does not point back.
    pub is_stale_peer: Option<bool>,
    /// Receiver's library status for this route.
    pub library_status: Option<LibraryStatus>,
    /// Route config was synthesized from defaults.
    pub synthetic: Option<bool>,
    /// Packets delivered on the route.
    #[serde(default)]
    pub packet_count: u64,
    /// Block of the last delivered packet.
    #[serde(default)]
    pub last_packet_block: Option<u64>,
    /// Unix timestamp of the last delivered packet.
    #[serde(default)]
    pub last_packet_timestamp: Option<u64>,
}

impl GraphEdge {
    /// Ordered `(from, to)` key.
    pub fn key(&self) -> String {
        edge_key(&self.from, &self.to)
    }
}

/// Key of an ordered edge.
pub fn edge_key(from: &str, to: &str) -> String {
    format!("{}->{}", from, to)
}

/// A node whose batch could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchFailure {
    /// OApp id that failed.
    pub oapp_id: String,
    /// Depth it was dequeued at.
    pub depth: i32,
    /// Error text.
    pub error: String,
}

/// Output of one crawl run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Seed OApp id.
    pub seed: String,
    /// Effective max depth.
    pub crawl_depth: u32,
    /// When the crawl finished (ISO-8601).
    pub timestamp: DateTime<Utc>,
    /// All nodes, crawl order first, then dangling.
    pub nodes: Vec<GraphNode>,
    /// All edges, in creation order.
    pub edges: Vec<GraphEdge>,
    /// Nodes whose fetch failed; empty for a complete crawl.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FetchFailure>,
}

impl CrawlResult {
    /// Whether every dequeued node was fetched.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
