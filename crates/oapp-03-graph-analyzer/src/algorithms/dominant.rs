//! # Dominant DVN Policy
//!
//! The policy most healthy routes in the graph use. Blocked routes, sentinel
//! routes and routes without a fingerprint do not vote.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{DominantCombination, EdgeSecurity};

/// Pick the dominant policy among `edges`, given in crawl edge order.
///
/// Ties go to the policy seen first.
pub fn dominant_combination<'a, I>(edges: I) -> Option<DominantCombination>
where
    I: IntoIterator<Item = &'a EdgeSecurity>,
{
    let mut groups: Vec<DominantCombination> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut grouped = 0usize;

    for edge in edges {
        if edge.is_blocked || edge.uses_sentinel {
            continue;
        }
        let Some(fp) = edge.fingerprint.as_ref() else {
            continue;
        };
        grouped += 1;

        let slot = *index.entry(fp.clone()).or_insert_with(|| {
            groups.push(DominantCombination {
                fingerprint: fp.clone(),
                required_dvn_count: edge.required_dvn_count,
                normalized_names: edge.required_dvn_labels.clone(),
                count: 0,
                share: 0.0,
                to_nodes: BTreeSet::new(),
                src_endpoint_ids: BTreeSet::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.count += 1;
        group.to_nodes.insert(edge.to.clone());
        group.src_endpoint_ids.insert(edge.source_endpoint_id.clone());
    }

    // `max_by_key` keeps the last maximum; fold keeps the first.
    let mut best = groups.into_iter().fold(None::<DominantCombination>, |best, g| match best {
        Some(b) if b.count >= g.count => Some(b),
        _ => Some(g),
    })?;
    best.share = best.count as f64 / grouped as f64;
    Some(best)
}
