//! # Blocked Nodes
//!
//! Only direct inbound edges are considered; blocking does not propagate.

use std::collections::{BTreeMap, BTreeSet};

use shared_types::{CrawlResult, GraphNode};

use crate::domain::EdgeSecurity;

fn has_configured_route(node: &GraphNode) -> bool {
    node.security_configs
        .iter()
        .any(|c| c.peer_state_hint.is_configured())
}

/// Ids of nodes no packet can reach.
///
/// A node is blocked when it has inbound edges and all of them are blocked,
/// or when it is a crawled, tracked, non-seed node without a single
/// configured route.
pub fn blocked_nodes(crawl: &CrawlResult, edges: &BTreeMap<String, EdgeSecurity>) -> BTreeSet<String> {
    let mut inbound: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for edge in edges.values() {
        let (total, blocked) = inbound.entry(edge.to.as_str()).or_default();
        *total += 1;
        if edge.is_blocked {
            *blocked += 1;
        }
    }

    crawl
        .nodes
        .iter()
        .filter(|node| {
            let all_inbound_blocked = inbound
                .get(node.id.as_str())
                .is_some_and(|(total, blocked)| *total > 0 && total == blocked);
            let unconfigured = node.id != crawl.seed
                && !node.is_dangling
                && node.is_tracked
                && !has_configured_route(node);
            all_inbound_blocked || unconfigured
        })
        .map(|node| node.id.clone())
        .collect()
}
