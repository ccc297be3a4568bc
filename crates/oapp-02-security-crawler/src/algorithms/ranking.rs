//! # Default-Config Ranking
//!
//! Lists the OApps that run on the chain default config, busiest first.
//! OApps without a traffic record keep their input order at the end.

use std::collections::{BTreeSet, HashMap};

use shared_types::{ConfigBatch, OAppRecord};

use crate::domain::RankedOApp;

/// Rank `default_config_ids` by the packet totals in `stats`.
///
/// Duplicate ids are reported once, at their best position.
pub fn rank_default_config_oapps(
    stats: &[OAppRecord],
    default_config_ids: &[String],
) -> Vec<RankedOApp> {
    let mut ordered: Vec<&OAppRecord> = stats.iter().collect();
    ordered.sort_by(|a, b| b.total_packets_received.cmp(&a.total_packets_received));

    let mut rank_of: HashMap<&str, (usize, u64)> = HashMap::new();
    for (rank, record) in ordered.iter().enumerate() {
        rank_of
            .entry(record.id.as_str())
            .or_insert((rank, record.total_packets_received));
    }

    let mut ranked: Vec<RankedOApp> = default_config_ids
        .iter()
        .map(|id| {
            let known = rank_of.get(id.as_str()).copied();
            RankedOApp {
                oapp_id: id.clone(),
                rank: known.map(|(rank, _)| rank),
                total_packets_received: known.map(|(_, total)| total).unwrap_or(0),
            }
        })
        .collect();
    ranked.sort_by_key(|r| r.rank.unwrap_or(usize::MAX));

    let mut seen = BTreeSet::new();
    ranked.retain(|r| seen.insert(r.oapp_id.clone()));
    ranked
}

/// Rank the default-config OApps found in a batch snapshot.
///
/// An OApp counts as default-config when any of its materialized rows
/// carries the indexer's `usesDefaultConfig` flag.
pub fn rank_batch_default_config(batch: &ConfigBatch, limit: usize) -> Vec<RankedOApp> {
    let stats: Vec<OAppRecord> = batch.oapps.values().cloned().collect();
    let ids: Vec<String> = batch
        .origin
        .iter()
        .filter(|(_, rows)| rows.iter().any(|r| r.uses_default_config == Some(true)))
        .map(|(id, _)| id.clone())
        .collect();

    let mut ranked = rank_default_config_oapps(&stats, &ids);
    ranked.truncate(limit);
    ranked
}
