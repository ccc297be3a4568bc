//! # Domain Value Objects
//!
//! Resolver input view and output.

use serde::{Deserialize, Serialize};
use shared_types::{
    ConfigBatch, OAppId, PeerRecord, PeerStateHint, ReceiveLibraryRow, RouteStatRow,
    SecurityConfigEntry, SecurityConfigRow, UlnConfigRow,
};

/// Everything known about one OApp's inbound routes.
///
/// Borrowed view over a [`ConfigBatch`]; the resolver never copies the
/// upstream rows it does not emit.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    /// OApp id text.
    pub oapp_id: &'a str,
    /// Local endpoint id of the OApp.
    pub local_eid: &'a str,
    /// Normalized OApp address.
    pub oapp_address: &'a str,
    /// Materialized security configs.
    pub security_configs: &'a [SecurityConfigRow],
    /// Chain default receive libraries of `local_eid`.
    pub default_receive_libraries: &'a [ReceiveLibraryRow],
    /// Chain default ULN configs of `local_eid`.
    pub default_uln_configs: &'a [UlnConfigRow],
    /// Peer registrations of the OApp.
    pub oapp_peers: &'a [PeerRecord],
    /// Receive-library overrides of the OApp.
    pub oapp_receive_libraries: &'a [ReceiveLibraryRow],
    /// ULN config overrides of the OApp.
    pub oapp_uln_configs: &'a [UlnConfigRow],
    /// Observed route traffic.
    pub route_stats: &'a [RouteStatRow],
}

fn rows<'a, T>(map: &'a std::collections::BTreeMap<String, Vec<T>>, key: &str) -> &'a [T] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}

impl<'a> ResolveInput<'a> {
    /// Build the view for `oapp` out of a fetched batch.
    pub fn from_batch(batch: &'a ConfigBatch, oapp: &'a OAppId, oapp_id: &'a str) -> Self {
        let local_eid = oapp.endpoint_id();
        Self {
            oapp_id,
            local_eid,
            oapp_address: oapp.address(),
            security_configs: rows(&batch.origin, oapp_id),
            default_receive_libraries: rows(&batch.default_libraries, local_eid),
            default_uln_configs: rows(&batch.default_configs, local_eid),
            oapp_peers: rows(&batch.peer_records_by_oapp, oapp_id),
            oapp_receive_libraries: rows(&batch.oapp_libraries, oapp_id),
            oapp_uln_configs: rows(&batch.oapp_configs, oapp_id),
            route_stats: rows(&batch.route_stats, oapp_id),
        }
    }
}

/// Route counts for one OApp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionSummary {
    /// Number of routes.
    pub total_routes: usize,
    /// Routes synthesized from defaults.
    pub synthetic_count: usize,
    /// Routes without any peer registration.
    pub implicit_blocks: usize,
    /// Routes whose peer is zero/dead.
    pub explicit_blocks: usize,
}

impl ResolutionSummary {
    /// Count over resolved rows.
    pub fn from_rows(rows: &[SecurityConfigEntry]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.total_routes += 1;
            if row.synthetic {
                acc.synthetic_count += 1;
            }
            match row.peer_state_hint {
                PeerStateHint::ImplicitBlocked => acc.implicit_blocks += 1,
                PeerStateHint::ExplicitBlocked => acc.explicit_blocks += 1,
                _ => {}
            }
            acc
        })
    }
}

/// Resolver output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSecurity {
    /// One row per route, sorted by endpoint id.
    pub rows: Vec<SecurityConfigEntry>,
    /// Route counts.
    pub summary: ResolutionSummary,
}
