//! Synthetic upstream snapshots.
//!
//! [`mesh`] builds a hub OApp on 30101 peered both ways with one spoke per
//! remote chain. Every chain defaults to {LayerZero Labs, Nethermind}; the
//! hub overrides the route from the first spoke to {LayerZero Labs, Horizen}.

use shared_types::{
    ConfigBatch, OAppRecord, PeerRecord, ReceiveLibraryRow, ResolverConfig, RouteStatRow,
    UlnConfigRow,
};

/// Local endpoint of the hub.
pub const HUB_EID: u32 = 30101;
/// Tracked receive library on every chain.
pub const LIBRARY: &str = "0xc02ab410f0734efa3f14628780e6e695156024c2";
/// LayerZero Labs DVN.
pub const DVN_LZ: &str = "0x589dedbd617e0cbcb916a9223f4d1300c294236b";
/// Nethermind DVN.
pub const DVN_NETHERMIND: &str = "0xa59ba433ac34d2927232918ef5b2eaafcf130ba5";
/// Horizen DVN.
pub const DVN_HORIZEN: &str = "0x380275805876ff19055ea900cdb2b46a94ecf20d";

/// OApp id with a numeric address.
pub fn oapp_id(eid: u32, n: u64) -> String {
    format!("{}_0x{:040x}", eid, n)
}

/// Address half of an OApp id.
pub fn address_of(id: &str) -> &str {
    id.rsplit_once('_').map(|(_, a)| a).unwrap_or(id)
}

/// Peer registration of `owner` on `eid`.
pub fn peer_record(owner: &str, eid: u32, peer: &str) -> PeerRecord {
    PeerRecord {
        oapp_id: owner.to_string(),
        eid: eid.to_string(),
        peer: Some(peer.to_string()),
        from_packet_delivered: false,
    }
}

fn default_uln(eid: u32, dvns: &[&str]) -> UlnConfigRow {
    UlnConfigRow {
        eid: eid.to_string(),
        confirmations: Some(15),
        required_dvn_count: Some(dvns.len() as u32),
        required_dvns: dvns.iter().map(|d| d.to_string()).collect(),
        optional_dvn_count: Some(0),
        optional_dvns: vec![],
        optional_dvn_threshold: Some(0),
    }
}

fn library_row(eid: u32) -> ReceiveLibraryRow {
    ReceiveLibraryRow {
        eid: eid.to_string(),
        library: Some(LIBRARY.to_string()),
    }
}

/// Hub-and-spoke snapshot.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Upstream rows.
    pub batch: ConfigBatch,
    /// Hub OApp id.
    pub hub: String,
    /// Spoke OApp ids, spoke `i` on endpoint `30102 + i`.
    pub spokes: Vec<String>,
    /// Resolver config tracking [`LIBRARY`] everywhere.
    pub resolver: ResolverConfig,
}

/// Build a mesh with `spokes` remote chains.
pub fn mesh(spokes: usize) -> Mesh {
    let hub = oapp_id(HUB_EID, 0x1111);
    let mut batch = ConfigBatch::default();
    let mut resolver = ResolverConfig::default().with_tracked_library(&HUB_EID.to_string(), LIBRARY);

    batch.oapps.insert(
        hub.clone(),
        OAppRecord {
            id: hub.clone(),
            total_packets_received: 1_000,
            last_packet_block: Some(19_000_000),
        },
    );

    let mut spoke_ids = Vec::with_capacity(spokes);
    for i in 0..spokes {
        let eid = 30102 + i as u32;
        let spoke = oapp_id(eid, 0x2000 + i as u64);
        resolver = resolver.with_tracked_library(&eid.to_string(), LIBRARY);

        batch.oapps.insert(
            spoke.clone(),
            OAppRecord {
                id: spoke.clone(),
                total_packets_received: 10 * (i as u64 + 1),
                last_packet_block: None,
            },
        );

        // Hub <-> spoke registrations.
        let hub_side = peer_record(&hub, eid, address_of(&spoke));
        let spoke_side = peer_record(&spoke, HUB_EID, address_of(&hub));
        batch
            .peer_records_by_oapp
            .entry(hub.clone())
            .or_default()
            .push(hub_side.clone());
        batch
            .peer_records_by_oapp
            .insert(spoke.clone(), vec![spoke_side.clone()]);
        batch.referencing.entry(hub.clone()).or_default().push(spoke_side);
        batch.referencing.insert(spoke.clone(), vec![hub_side]);

        // Chain defaults, keyed by local endpoint.
        batch
            .default_libraries
            .entry(HUB_EID.to_string())
            .or_default()
            .push(library_row(eid));
        batch
            .default_configs
            .entry(HUB_EID.to_string())
            .or_default()
            .push(default_uln(eid, &[DVN_LZ, DVN_NETHERMIND]));
        batch
            .default_libraries
            .insert(eid.to_string(), vec![library_row(HUB_EID)]);
        batch.default_configs.insert(
            eid.to_string(),
            vec![default_uln(HUB_EID, &[DVN_NETHERMIND, DVN_LZ])],
        );

        batch.route_stats.entry(hub.clone()).or_default().push(RouteStatRow {
            src_eid: eid.to_string(),
            packet_count: 100 * (i as u64 + 1),
            last_packet_block: Some(19_000_000 + i as u64),
            last_packet_timestamp: None,
        });

        spoke_ids.push(spoke);
    }

    if let Some(first) = spoke_ids.first() {
        let eid = first.split_once('_').map(|(e, _)| e).unwrap_or_default();
        batch.oapp_configs.insert(
            hub.clone(),
            vec![UlnConfigRow {
                eid: eid.to_string(),
                required_dvn_count: Some(2),
                required_dvns: vec![DVN_LZ.to_string(), DVN_HORIZEN.to_string()],
                ..Default::default()
            }],
        );
    }

    Mesh {
        batch,
        hub,
        spokes: spoke_ids,
        resolver,
    }
}

/// A linear chain `c0 <- c1 <- ... <- c(n-1)`, each trusting the next one.
pub fn chain(length: usize) -> (ConfigBatch, Vec<String>) {
    let ids: Vec<String> = (0..length)
        .map(|i| oapp_id(30101 + i as u32, 0x3000 + i as u64))
        .collect();
    let mut batch = ConfigBatch::default();
    for (i, id) in ids.iter().enumerate() {
        batch.oapps.insert(
            id.clone(),
            OAppRecord {
                id: id.clone(),
                total_packets_received: i as u64,
                last_packet_block: None,
            },
        );
        if let Some(next) = ids.get(i + 1) {
            let eid = 30101 + i as u32 + 1;
            batch
                .peer_records_by_oapp
                .insert(id.clone(), vec![peer_record(id, eid, address_of(next))]);
        }
    }
    (batch, ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_shape() {
        let m = mesh(3);
        assert_eq!(m.spokes.len(), 3);
        assert_eq!(m.batch.oapps.len(), 4);
        assert_eq!(m.batch.peer_records_by_oapp[&m.hub].len(), 3);
        assert_eq!(m.spokes[0], "30102_0x0000000000000000000000000000000000002000");
    }

    #[test]
    fn test_chain_links() {
        let (batch, ids) = chain(3);
        assert_eq!(ids.len(), 3);
        assert_eq!(batch.peer_records_by_oapp.len(), 2);
    }
}
