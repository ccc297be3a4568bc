//! # Column Layout
//!
//! Places nodes in columns by hop distance from a center node. Positions are
//! a pure function of the crawl and the config: the jitter comes from a hash
//! of the node id, not from a random source.

use sha2::{Digest, Sha256};
use shared_types::{CrawlResult, LayoutConfig};
use std::collections::{BTreeMap, VecDeque};

use crate::domain::{LayoutError, NodePosition};

/// Undirected hop distance from `center` to every reachable node.
fn bfs_distances<'a>(crawl: &'a CrawlResult, center: &'a str) -> BTreeMap<&'a str, usize> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in &crawl.edges {
        adjacency.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
        adjacency.entry(edge.to.as_str()).or_default().push(edge.from.as_str());
    }

    let mut distances = BTreeMap::from([(center, 0usize)]);
    let mut queue = VecDeque::from([center]);
    while let Some(id) = queue.pop_front() {
        let next = distances[id] + 1;
        for &neighbor in adjacency.get(id).map(Vec::as_slice).unwrap_or(&[]) {
            if !distances.contains_key(neighbor) {
                distances.insert(neighbor, next);
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

/// Deterministic offset in `[-amplitude, amplitude]`.
fn jitter(id: &str, amplitude: f64) -> f64 {
    if amplitude == 0.0 {
        return 0.0;
    }
    let digest = Sha256::digest(id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let unit = u64::from_be_bytes(bytes) as f64 / u64::MAX as f64;
    (unit * 2.0 - 1.0) * amplitude
}

/// Lay out every node of `crawl` around `center`.
///
/// Nodes keep crawl order within a column.
pub fn layout_graph(
    crawl: &CrawlResult,
    center: &str,
    config: &LayoutConfig,
) -> Result<Vec<NodePosition>, LayoutError> {
    if crawl.node(center).is_none() {
        return Err(LayoutError::UnknownCenter(center.to_string()));
    }

    let distances = bfs_distances(crawl, center);
    let unreachable = distances.values().copied().max().unwrap_or(0) + 1;

    // Group by distance, then split oversized groups into sub-columns.
    let mut by_distance: BTreeMap<usize, Vec<(&str, Option<usize>)>> = BTreeMap::new();
    for node in &crawl.nodes {
        let distance = distances.get(node.id.as_str()).copied();
        by_distance
            .entry(distance.unwrap_or(unreachable))
            .or_default()
            .push((node.id.as_str(), distance));
    }

    let per_column = config.max_nodes_per_column.max(1);
    let max_columns = config.max_columns.max(1);
    let mut columns: Vec<Vec<(&str, Option<usize>)>> = Vec::new();
    for group in by_distance.into_values() {
        for chunk in group.chunks(per_column) {
            let slot = columns.len().min(max_columns - 1);
            if slot < columns.len() {
                columns[slot].extend_from_slice(chunk);
            } else {
                columns.push(chunk.to_vec());
            }
        }
    }

    let inner_width = (config.width - 2.0 * config.margin).max(0.0);
    let inner_height = (config.height - 2.0 * config.margin).max(0.0);
    let spacing = if columns.len() > 1 {
        config
            .column_spacing
            .min(inner_width / (columns.len() - 1) as f64)
    } else {
        config.column_spacing
    };
    let centre_y = config.height / 2.0;
    let half_height = inner_height / 2.0;

    let mut positions = Vec::with_capacity(crawl.nodes.len());
    for (column, members) in columns.iter().enumerate() {
        let base_x = config.margin + column as f64 * spacing;
        for (row, &(id, distance)) in members.iter().enumerate() {
            let y = if members.len() == 1 {
                centre_y
            } else {
                config.margin + row as f64 * inner_height / (members.len() - 1) as f64
            };
            let t = if half_height > 0.0 {
                (y - centre_y) / half_height
            } else {
                0.0
            };
            positions.push(NodePosition {
                id: id.to_string(),
                column,
                distance,
                x: base_x + config.curvature * t * t,
                y: y + jitter(id, config.jitter),
            });
        }
    }

    Ok(positions)
}
