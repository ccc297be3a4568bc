//! # Edge Construction
//!
//! One edge per resolved route, pointing from the configured peer (sender)
//! to the OApp whose receive config governs the route. A pair of OApps seen
//! from several nodes collapses into one edge; later sightings only fill
//! gaps.

use shared_types::{
    is_dead_address, normalize_oapp_id, BlockReason, GraphEdge, LibraryStatus, PeerRecord,
    RouteStatRow, SecurityConfigEntry,
};

/// Traffic on one route: `(packet_count, last_block, last_timestamp)`.
pub type RouteActivity = (u64, Option<u64>, Option<u64>);

/// Busiest traffic row for `src_eid`, zero when none.
pub fn route_activity(stats: &[RouteStatRow], src_eid: &str) -> RouteActivity {
    stats
        .iter()
        .filter(|s| s.src_eid == src_eid)
        .max_by_key(|s| s.packet_count)
        .map(|s| (s.packet_count, s.last_packet_block, s.last_packet_timestamp))
        .unwrap_or((0, None, None))
}

/// Why the route cannot deliver, judged from the route alone.
pub fn block_reason_hint(row: &SecurityConfigEntry) -> Option<BlockReason> {
    BlockReason::from_peer_hint(row.peer_state_hint)
        .or_else(|| (row.library_status == LibraryStatus::Absent).then_some(BlockReason::NoLibrary))
        .or_else(|| {
            row.required_dvns
                .iter()
                .any(|dvn| is_dead_address(dvn))
                .then_some(BlockReason::DeadDvn)
        })
}

/// Whether the route's configured peer is out of date.
///
/// `referencing` holds registrations of other OApps naming this node as
/// their peer. When some of them live on the route's endpoint and none of
/// them is the configured peer, the node trusts an OApp that does not trust
/// it back.
pub fn is_stale_peer(row: &SecurityConfigEntry, referencing: &[PeerRecord]) -> bool {
    let Some(configured) = row.peer_oapp_id.as_deref() else {
        return false;
    };

    let mut owners = referencing
        .iter()
        .filter_map(|r| normalize_oapp_id(&r.oapp_id).ok())
        .filter(|owner| {
            owner
                .rsplit_once('_')
                .is_some_and(|(eid, _)| eid == row.source_endpoint_id)
        })
        .peekable();

    owners.peek().is_some() && !owners.any(|owner| owner == configured)
}

/// Edge context for one resolved route of `to`. `None` when the peer did
/// not resolve to an OApp id.
pub fn build_edge(
    to: &str,
    row: &SecurityConfigEntry,
    referencing: &[PeerRecord],
    stats: &[RouteStatRow],
) -> Option<GraphEdge> {
    let from = row.peer_oapp_id.clone()?;
    let (packet_count, last_packet_block, last_packet_timestamp) =
        route_activity(stats, &row.source_endpoint_id);

    Some(GraphEdge {
        from,
        to: to.to_string(),
        source_endpoint_id: row.source_endpoint_id.clone(),
        peer_state_hint: Some(row.peer_state_hint),
        block_reason_hint: block_reason_hint(row),
        is_stale_peer: Some(is_stale_peer(row, referencing)),
        library_status: Some(row.library_status),
        synthetic: Some(row.synthetic),
        packet_count,
        last_packet_block,
        last_packet_timestamp,
    })
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Merge a later context into an existing edge.
///
/// Only empty fields are filled; traffic metrics are replaced as a unit when
/// the incoming packet count is strictly larger.
pub fn merge_edge(existing: &mut GraphEdge, incoming: GraphEdge) {
    fill(&mut existing.peer_state_hint, incoming.peer_state_hint);
    fill(&mut existing.block_reason_hint, incoming.block_reason_hint);
    fill(&mut existing.is_stale_peer, incoming.is_stale_peer);
    fill(&mut existing.library_status, incoming.library_status);
    fill(&mut existing.synthetic, incoming.synthetic);

    if incoming.packet_count > existing.packet_count {
        existing.packet_count = incoming.packet_count;
        existing.last_packet_block = incoming.last_packet_block;
        existing.last_packet_timestamp = incoming.last_packet_timestamp;
    }
}
