//! # Config Batch
//!
//! Raw per-OApp rows exchanged across the loader boundary. The crawler asks
//! the loader for a batch of OApp ids and the resolver consumes the result.
//!
//! Upstream GraphQL layers encode big integers as strings, so numeric fields
//! accept both JSON numbers and decimal strings.

use crate::entities::{FallbackField, LibraryStatus};
use crate::identifiers::OAppId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst, VecSkipError};
use std::collections::{BTreeMap, BTreeSet};

/// Deserialize an endpoint id given either as a string or a number.
pub fn deserialize_endpoint_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s.trim().to_string(),
        Raw::Number(n) => n.to_string(),
    })
}

/// Indexer metadata for one OApp.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAppRecord {
    /// OApp id text.
    pub id: String,
    /// Total packets received.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub total_packets_received: u64,
    /// Block of the last received packet.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub last_packet_block: Option<u64>,
}

/// A peer registration: `oapp_id` trusts `peer` on remote endpoint `eid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRecord {
    /// OApp that owns the registration.
    pub oapp_id: String,
    /// Remote endpoint id.
    #[serde(deserialize_with = "deserialize_endpoint_id")]
    pub eid: String,
    /// Raw peer value (bytes32 or address).
    #[serde(default)]
    pub peer: Option<String>,
    /// Learned from inbound traffic rather than a `setPeer` call.
    #[serde(default)]
    pub from_packet_delivered: bool,
}

/// A receive-library setting for one remote endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveLibraryRow {
    /// Remote endpoint id.
    #[serde(deserialize_with = "deserialize_endpoint_id")]
    pub eid: String,
    /// Library address.
    #[serde(default)]
    pub library: Option<String>,
}

/// A ULN config for one remote endpoint (chain default or OApp override).
///
/// Zero/absent values mean "inherit".
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlnConfigRow {
    /// Remote endpoint id.
    #[serde(deserialize_with = "deserialize_endpoint_id")]
    pub eid: String,
    /// Block confirmations.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub confirmations: Option<u64>,
    /// Required DVN count.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "requiredDVNCount", default)]
    pub required_dvn_count: Option<u32>,
    /// Required DVN addresses.
    #[serde(rename = "requiredDVNs", default)]
    pub required_dvns: Vec<String>,
    /// Optional DVN count.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "optionalDVNCount", default)]
    pub optional_dvn_count: Option<u32>,
    /// Optional DVN addresses.
    #[serde(rename = "optionalDVNs", default)]
    pub optional_dvns: Vec<String>,
    /// Optional DVN threshold.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "optionalDVNThreshold", default)]
    pub optional_dvn_threshold: Option<u32>,
}

impl UlnConfigRow {
    /// Whether any DVN parameter differs from "inherit".
    pub fn has_dvn_override(&self) -> bool {
        self.required_dvn_count.unwrap_or(0) != 0
            || !self.required_dvns.is_empty()
            || self.optional_dvn_count.unwrap_or(0) != 0
            || !self.optional_dvns.is_empty()
            || self.optional_dvn_threshold.unwrap_or(0) != 0
    }
}

/// Observed traffic on one route.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStatRow {
    /// Sending endpoint id.
    #[serde(deserialize_with = "deserialize_endpoint_id")]
    pub src_eid: String,
    /// Packets delivered.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub packet_count: u64,
    /// Block of the last packet.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub last_packet_block: Option<u64>,
    /// Unix timestamp of the last packet.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub last_packet_timestamp: Option<u64>,
}

/// A security config row materialized by the indexer.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfigRow {
    /// Remote endpoint id.
    #[serde(deserialize_with = "deserialize_endpoint_id")]
    pub eid: String,
    /// Effective receive library.
    #[serde(default)]
    pub effective_receive_library: Option<String>,
    /// Effective confirmations.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub effective_confirmations: Option<u64>,
    /// Required DVN count.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "requiredDVNCount", default)]
    pub required_dvn_count: Option<u32>,
    /// Required DVN addresses.
    #[serde(rename = "requiredDVNs", default)]
    pub required_dvns: Vec<String>,
    /// Optional DVN count.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "optionalDVNCount", default)]
    pub optional_dvn_count: Option<u32>,
    /// Optional DVN addresses.
    #[serde(rename = "optionalDVNs", default)]
    pub optional_dvns: Vec<String>,
    /// Optional DVN threshold.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "optionalDVNThreshold", default)]
    pub optional_dvn_threshold: Option<u32>,
    /// Stored library status.
    #[serde(default)]
    pub library_status: Option<LibraryStatus>,
    /// Stored fallback fields; unknown names are dropped.
    #[serde_as(as = "VecSkipError<_>")]
    #[serde(default)]
    pub fallback_fields: Vec<FallbackField>,
    /// Stored peer value.
    #[serde(default)]
    pub peer: Option<String>,
    /// Stored hint; never trusted, always recomputed.
    #[serde(default)]
    pub peer_state_hint: Option<String>,
    /// Indexer flag: the OApp runs on the default config.
    #[serde(default)]
    pub uses_default_config: Option<bool>,
}

/// Everything the resolver needs for a set of OApps.
///
/// `default_libraries` and `default_configs` are keyed by local endpoint id;
/// every other map by normalized OApp id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigBatch {
    /// Materialized security configs of the requested OApps.
    #[serde(default)]
    pub origin: BTreeMap<String, Vec<SecurityConfigRow>>,
    /// Peer registrations of other OApps that name the requested OApp.
    #[serde(default)]
    pub referencing: BTreeMap<String, Vec<PeerRecord>>,
    /// Indexer metadata.
    #[serde(default)]
    pub oapps: BTreeMap<String, OAppRecord>,
    /// Peer registrations owned by the requested OApps.
    #[serde(default)]
    pub peer_records_by_oapp: BTreeMap<String, Vec<PeerRecord>>,
    /// Chain default receive libraries.
    #[serde(default)]
    pub default_libraries: BTreeMap<String, Vec<ReceiveLibraryRow>>,
    /// Chain default ULN configs.
    #[serde(default)]
    pub default_configs: BTreeMap<String, Vec<UlnConfigRow>>,
    /// OApp receive-library overrides.
    #[serde(default)]
    pub oapp_libraries: BTreeMap<String, Vec<ReceiveLibraryRow>>,
    /// OApp ULN config overrides.
    #[serde(default)]
    pub oapp_configs: BTreeMap<String, Vec<UlnConfigRow>>,
    /// Observed route traffic.
    #[serde(default)]
    pub route_stats: BTreeMap<String, Vec<RouteStatRow>>,
}

impl ConfigBatch {
    /// Restrict a larger snapshot to the rows relevant to `ids`.
    ///
    /// Ids that fail to parse are ignored.
    pub fn subset(&self, ids: &[String]) -> ConfigBatch {
        let wanted: BTreeSet<String> = ids
            .iter()
            .filter_map(|id| OAppId::parse(id).ok())
            .map(|id| id.to_string())
            .collect();
        let local_eids: BTreeSet<String> = wanted
            .iter()
            .filter_map(|id| OAppId::parse(id).ok())
            .map(|id| id.endpoint_id().to_string())
            .collect();

        fn pick<V: Clone>(
            map: &BTreeMap<String, V>,
            keys: &BTreeSet<String>,
        ) -> BTreeMap<String, V> {
            map.iter()
                .filter(|(k, _)| keys.contains(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        }

        ConfigBatch {
            origin: pick(&self.origin, &wanted),
            referencing: pick(&self.referencing, &wanted),
            oapps: pick(&self.oapps, &wanted),
            peer_records_by_oapp: pick(&self.peer_records_by_oapp, &wanted),
            default_libraries: pick(&self.default_libraries, &local_eids),
            default_configs: pick(&self.default_configs, &local_eids),
            oapp_libraries: pick(&self.oapp_libraries, &wanted),
            oapp_configs: pick(&self.oapp_configs, &wanted),
            route_stats: pick(&self.route_stats, &wanted),
        }
    }
}
