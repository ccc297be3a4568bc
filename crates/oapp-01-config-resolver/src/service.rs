//! # Security Config Resolver Service
//!
//! Application service implementing [`RouteResolver`].
//!
//! For each candidate route of an OApp the resolver either passes the
//! indexer's materialized row through (recomputing only the peer hint) or
//! synthesizes a row from chain defaults layered under OApp overrides.
//!
//! Candidate routes are the union of the endpoint ids seen in any input
//! collection, including endpoints that only show up in route traffic.

use std::collections::{BTreeMap, BTreeSet};

use oapp_telemetry::{metric_inc, RESOLVER_ROUTES};
use shared_types::{
    canonicalize_fallback_fields, compare_endpoint_ids, is_valid_endpoint_id, normalize_address,
    FallbackField, LibraryStatus, PeerRecord, ReceiveLibraryRow, ResolverConfig, RouteStatRow,
    SecurityConfigEntry, SecurityConfigRow, SourceType, UlnConfigRow, CONFIRMATIONS_SENTINEL,
    REQUIRED_DVN_SENTINEL,
};
use tracing::debug;

use crate::algorithms::{effective_library, interpret_peer, layer_uln, library_status};
use crate::domain::{ResolutionSummary, ResolveInput, ResolvedSecurity, ResolverError};
use crate::ports::inbound::RouteResolver;

/// Per-endpoint lookup tables over one [`ResolveInput`].
struct RouteTables<'a> {
    materialized: BTreeMap<&'a str, &'a SecurityConfigRow>,
    default_libraries: BTreeMap<&'a str, &'a ReceiveLibraryRow>,
    default_ulns: BTreeMap<&'a str, &'a UlnConfigRow>,
    peers: BTreeMap<&'a str, &'a PeerRecord>,
    oapp_libraries: BTreeMap<&'a str, &'a ReceiveLibraryRow>,
    oapp_ulns: BTreeMap<&'a str, &'a UlnConfigRow>,
    route_stats: BTreeMap<&'a str, &'a RouteStatRow>,
}

fn first_by_eid<'a, T>(rows: &'a [T], eid: impl Fn(&T) -> &str) -> BTreeMap<&'a str, &'a T> {
    let mut map = BTreeMap::new();
    for row in rows {
        map.entry(eid(row)).or_insert(row);
    }
    map
}

impl<'a> RouteTables<'a> {
    fn build(input: &ResolveInput<'a>) -> Self {
        // A `setPeer` registration outranks one learned from traffic.
        let mut peers: BTreeMap<&str, &PeerRecord> = BTreeMap::new();
        for record in input.oapp_peers {
            match peers.get(record.eid.as_str()) {
                Some(existing) if !existing.from_packet_delivered || record.from_packet_delivered => {}
                _ => {
                    peers.insert(record.eid.as_str(), record);
                }
            }
        }

        // Busiest row per endpoint.
        let mut route_stats: BTreeMap<&str, &RouteStatRow> = BTreeMap::new();
        for stat in input.route_stats {
            match route_stats.get(stat.src_eid.as_str()) {
                Some(existing) if existing.packet_count >= stat.packet_count => {}
                _ => {
                    route_stats.insert(stat.src_eid.as_str(), stat);
                }
            }
        }

        Self {
            materialized: first_by_eid(input.security_configs, |r| r.eid.as_str()),
            default_libraries: first_by_eid(input.default_receive_libraries, |r| r.eid.as_str()),
            default_ulns: first_by_eid(input.default_uln_configs, |r| r.eid.as_str()),
            peers,
            oapp_libraries: first_by_eid(input.oapp_receive_libraries, |r| r.eid.as_str()),
            oapp_ulns: first_by_eid(input.oapp_uln_configs, |r| r.eid.as_str()),
            route_stats,
        }
    }

    fn candidates(&self) -> BTreeSet<&'a str> {
        self.materialized
            .keys()
            .chain(self.default_libraries.keys())
            .chain(self.default_ulns.keys())
            .chain(self.peers.keys())
            .chain(self.oapp_libraries.keys())
            .chain(self.oapp_ulns.keys())
            .chain(self.route_stats.keys())
            .copied()
            .collect()
    }
}

fn check_candidate(eid: &str) -> Result<(), ResolverError> {
    if is_valid_endpoint_id(eid) {
        Ok(())
    } else {
        Err(ResolverError::InvalidEndpointId(eid.to_string()))
    }
}

fn normalize_list(addresses: &[String]) -> Vec<String> {
    addresses
        .iter()
        .map(|a| normalize_address(a).unwrap_or_else(|_| a.trim().to_ascii_lowercase()))
        .collect()
}

/// Summarize resolved (or stored) rows.
pub fn summarize(rows: &[SecurityConfigEntry]) -> ResolutionSummary {
    ResolutionSummary::from_rows(rows)
}

/// Security Config Resolver.
///
/// Holds only its configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct SecurityConfigResolver {
    config: ResolverConfig,
}

impl SecurityConfigResolver {
    /// Create a resolver with explicit configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn pass_through(
        &self,
        input: &ResolveInput<'_>,
        eid: &str,
        row: &SecurityConfigRow,
        peer_record: Option<&PeerRecord>,
    ) -> SecurityConfigEntry {
        let peer = interpret_peer(eid, peer_record, row.peer.as_deref());

        let mut fallback_fields = row.fallback_fields.clone();
        canonicalize_fallback_fields(&mut fallback_fields);

        SecurityConfigEntry {
            source_endpoint_id: eid.to_string(),
            local_endpoint_id: input.local_eid.to_string(),
            effective_receive_library: row
                .effective_receive_library
                .as_deref()
                .map(|lib| normalize_address(lib).unwrap_or_else(|_| lib.to_ascii_lowercase())),
            effective_confirmations: row.effective_confirmations.map(|c| {
                if c == CONFIRMATIONS_SENTINEL {
                    0
                } else {
                    c
                }
            }),
            required_dvns: normalize_list(&row.required_dvns),
            required_dvn_count: row.required_dvn_count,
            optional_dvns: normalize_list(&row.optional_dvns),
            optional_dvn_count: row.optional_dvn_count,
            optional_dvn_threshold: row.optional_dvn_threshold,
            uses_required_dvn_sentinel: row.required_dvn_count == Some(REQUIRED_DVN_SENTINEL),
            library_status: row.library_status.unwrap_or_default(),
            source_type: SourceType::Materialized,
            synthetic: false,
            fallback_fields,
            peer: peer.peer,
            peer_oapp_id: peer.peer_oapp_id,
            peer_resolved: peer.resolved,
            peer_state_hint: peer.hint,
        }
    }

    fn synthesize(
        &self,
        input: &ResolveInput<'_>,
        eid: &str,
        tables: &RouteTables<'_>,
    ) -> SecurityConfigEntry {
        let peer = interpret_peer(eid, tables.peers.get(eid).copied(), None);

        let library = effective_library(
            tables.oapp_libraries.get(eid).and_then(|r| r.library.as_deref()),
            tables.default_libraries.get(eid).and_then(|r| r.library.as_deref()),
        );
        let status = library_status(
            library.address.as_deref(),
            self.config.tracked_library(input.local_eid),
        );

        let mut entry = SecurityConfigEntry {
            source_endpoint_id: eid.to_string(),
            local_endpoint_id: input.local_eid.to_string(),
            effective_receive_library: library.address,
            effective_confirmations: None,
            required_dvns: Vec::new(),
            required_dvn_count: None,
            optional_dvns: Vec::new(),
            optional_dvn_count: None,
            optional_dvn_threshold: None,
            uses_required_dvn_sentinel: false,
            library_status: status,
            source_type: SourceType::DefaultDerived,
            synthetic: true,
            fallback_fields: Vec::new(),
            peer: peer.peer,
            peer_oapp_id: peer.peer_oapp_id,
            peer_resolved: peer.resolved,
            peer_state_hint: peer.hint,
        };

        if library.from_default {
            entry.fallback_fields.push(FallbackField::Library);
        }

        // DVN parameters only mean something under the tracked library.
        if status == LibraryStatus::Tracked {
            let uln = layer_uln(
                tables.oapp_ulns.get(eid).copied(),
                tables.default_ulns.get(eid).copied(),
            );
            entry.effective_confirmations = uln.confirmations;
            entry.required_dvns = uln.required_dvns;
            entry.required_dvn_count = uln.required_dvn_count;
            entry.optional_dvns = uln.optional_dvns;
            entry.optional_dvn_count = uln.optional_dvn_count;
            entry.optional_dvn_threshold = uln.optional_dvn_threshold;
            entry.uses_required_dvn_sentinel = uln.uses_required_dvn_sentinel;
            entry.fallback_fields.extend(uln.fallback_fields);
        }

        canonicalize_fallback_fields(&mut entry.fallback_fields);
        entry
    }
}

impl RouteResolver for SecurityConfigResolver {
    fn resolve(&self, input: &ResolveInput<'_>) -> ResolvedSecurity {
        let tables = RouteTables::build(input);

        let mut rows = Vec::new();
        for eid in tables.candidates() {
            if let Err(e) = check_candidate(eid) {
                debug!("[oapp-01] {}: skipping route: {}", input.oapp_id, e);
                continue;
            }

            let entry = match tables.materialized.get(eid) {
                Some(row) => {
                    metric_inc!(RESOLVER_ROUTES, &["materialized"]);
                    self.pass_through(input, eid, row, tables.peers.get(eid).copied())
                }
                None => {
                    metric_inc!(RESOLVER_ROUTES, &["default"]);
                    self.synthesize(input, eid, &tables)
                }
            };

            debug!(
                "[oapp-01] {} <- {}: {:?}, library {:?}, peer {:?}",
                input.oapp_id,
                eid,
                entry.source_type,
                entry.library_status,
                entry.peer_state_hint
            );
            rows.push(entry);
        }

        rows.sort_by(|a, b| compare_endpoint_ids(&a.source_endpoint_id, &b.source_endpoint_id));
        let summary = summarize(&rows);

        ResolvedSecurity { rows, summary }
    }
}
