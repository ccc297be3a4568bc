//! GraphQL loader for a Hasura-style indexer.
//!
//! One POST per batch. Every table is filtered with `_in` on the requested
//! OApp ids, except the chain defaults which are filtered on the requested
//! OApps' local endpoint ids.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{
    deserialize_endpoint_id, ConfigBatch, LoaderConfig, OAppId, OAppRecord, PeerRecord,
    ReceiveLibraryRow, RouteStatRow, SecurityConfigRow, UlnConfigRow,
};
use tracing::debug;

use crate::algorithms::rank_default_config_oapps;
use crate::domain::{LoaderError, RankedOApp};
use crate::ports::{ConfigBatchLoader, DefaultConfigDirectory};

const BATCH_QUERY: &str = r#"
query ConfigBatch($ids: [String!]!, $localEids: [String!]!) {
  OAppSecurityConfig(where: { oappId: { _in: $ids } }) {
    oappId eid effectiveReceiveLibrary effectiveConfirmations
    requiredDVNCount requiredDVNs optionalDVNCount optionalDVNs optionalDVNThreshold
    libraryStatus fallbackFields peer peerStateHint usesDefaultConfig
  }
  Referencing: OAppPeer(where: { peerOappId: { _in: $ids } }) {
    oappId eid peer fromPacketDelivered peerOappId
  }
  OAppStats(where: { id: { _in: $ids } }) {
    id totalPacketsReceived lastPacketBlock
  }
  OAppPeer(where: { oappId: { _in: $ids } }) {
    oappId eid peer fromPacketDelivered
  }
  DefaultReceiveLibrary(where: { localEid: { _in: $localEids } }) {
    localEid eid library
  }
  DefaultUlnConfig(where: { localEid: { _in: $localEids } }) {
    localEid eid confirmations
    requiredDVNCount requiredDVNs optionalDVNCount optionalDVNs optionalDVNThreshold
  }
  OAppReceiveLibrary(where: { oappId: { _in: $ids } }) {
    oappId eid library
  }
  OAppUlnConfig(where: { oappId: { _in: $ids } }) {
    oappId eid confirmations
    requiredDVNCount requiredDVNs optionalDVNCount optionalDVNs optionalDVNThreshold
  }
  OAppRouteStats(where: { oappId: { _in: $ids } }) {
    oappId srcEid packetCount lastPacketBlock lastPacketTimestamp
  }
}
"#;

const DEFAULT_CONFIG_QUERY: &str = r#"
query DefaultConfigOApps {
  OAppStats(order_by: { totalPacketsReceived: desc }) {
    id totalPacketsReceived
  }
  OAppSecurityConfig(where: { usesDefaultConfig: { _eq: true } }) {
    oappId
  }
}
"#;

/// Row keyed by the OApp that owns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByOApp<T> {
    oapp_id: String,
    #[serde(flatten)]
    row: T,
}

/// Row keyed by the local endpoint it is the default for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByLocalEid<T> {
    #[serde(deserialize_with = "deserialize_endpoint_id")]
    local_eid: String,
    #[serde(flatten)]
    row: T,
}

/// Peer registration keyed by the OApp it names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Referencing {
    peer_oapp_id: String,
    #[serde(flatten)]
    record: PeerRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BatchData {
    #[serde(rename = "OAppSecurityConfig", default)]
    security_configs: Vec<ByOApp<SecurityConfigRow>>,
    #[serde(default)]
    referencing: Vec<Referencing>,
    #[serde(rename = "OAppStats", default)]
    stats: Vec<OAppRecord>,
    #[serde(rename = "OAppPeer", default)]
    peers: Vec<PeerRecord>,
    #[serde(default)]
    default_receive_library: Vec<ByLocalEid<ReceiveLibraryRow>>,
    #[serde(default)]
    default_uln_config: Vec<ByLocalEid<UlnConfigRow>>,
    #[serde(rename = "OAppReceiveLibrary", default)]
    oapp_receive_libraries: Vec<ByOApp<ReceiveLibraryRow>>,
    #[serde(rename = "OAppUlnConfig", default)]
    oapp_uln_configs: Vec<ByOApp<UlnConfigRow>>,
    #[serde(rename = "OAppRouteStats", default)]
    route_stats: Vec<ByOApp<RouteStatRow>>,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    #[serde(rename = "oappId")]
    oapp_id: String,
}

#[derive(Debug, Deserialize)]
struct DefaultConfigData {
    #[serde(rename = "OAppStats", default)]
    stats: Vec<OAppRecord>,
    #[serde(rename = "OAppSecurityConfig", default)]
    configs: Vec<IdOnly>,
}

impl DefaultConfigData {
    /// Rows are per route, so the limit applies after ranking and dedup.
    fn into_ranked(self, limit: usize) -> Vec<RankedOApp> {
        let ids: Vec<String> = self.configs.into_iter().map(|c| c.oapp_id).collect();
        let mut ranked = rank_default_config_oapps(&self.stats, &ids);
        ranked.truncate(limit);
        ranked
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// Normalize an id column; unparseable ids are kept verbatim.
fn key(id: &str) -> String {
    OAppId::parse(id)
        .map(|id| id.to_string())
        .unwrap_or_else(|_| id.to_string())
}

fn group<T>(rows: impl IntoIterator<Item = (String, T)>) -> BTreeMap<String, Vec<T>> {
    let mut map: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for (k, row) in rows {
        map.entry(k).or_default().push(row);
    }
    map
}

impl BatchData {
    fn into_batch(self) -> ConfigBatch {
        ConfigBatch {
            origin: group(
                self.security_configs
                    .into_iter()
                    .map(|r| (key(&r.oapp_id), r.row)),
            ),
            referencing: group(
                self.referencing
                    .into_iter()
                    .map(|r| (key(&r.peer_oapp_id), r.record)),
            ),
            oapps: self
                .stats
                .into_iter()
                .map(|r| (key(&r.id), r))
                .collect(),
            peer_records_by_oapp: group(self.peers.into_iter().map(|r| (key(&r.oapp_id), r))),
            default_libraries: group(
                self.default_receive_library
                    .into_iter()
                    .map(|r| (r.local_eid, r.row)),
            ),
            default_configs: group(
                self.default_uln_config
                    .into_iter()
                    .map(|r| (r.local_eid, r.row)),
            ),
            oapp_libraries: group(
                self.oapp_receive_libraries
                    .into_iter()
                    .map(|r| (key(&r.oapp_id), r.row)),
            ),
            oapp_configs: group(
                self.oapp_uln_configs
                    .into_iter()
                    .map(|r| (key(&r.oapp_id), r.row)),
            ),
            route_stats: group(
                self.route_stats
                    .into_iter()
                    .map(|r| (key(&r.oapp_id), r.row)),
            ),
        }
    }
}

/// Loader talking to the indexer's GraphQL endpoint.
pub struct GraphqlBatchLoader {
    client: Client,
    endpoint: String,
}

impl GraphqlBatchLoader {
    /// Create a loader from configuration.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| LoaderError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, LoaderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LoaderError::Http(format!("Cannot connect to {}", self.endpoint))
                } else {
                    LoaderError::Http(e.to_string())
                }
            })?
            .error_for_status()
            .map_err(|e| LoaderError::Http(e.to_string()))?;

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| LoaderError::Parse(e.to_string()))?;

        if !body.errors.is_empty() {
            let messages: Vec<_> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(LoaderError::GraphQl(messages.join("; ")));
        }

        body.data
            .ok_or_else(|| LoaderError::Parse("Missing data in response".to_string()))
    }
}

/// Query variables for a batch: the ids plus their distinct local endpoints.
fn batch_variables(oapp_ids: &[String]) -> Value {
    let ids: Vec<String> = oapp_ids.iter().map(|id| key(id)).collect();
    let local_eids: BTreeSet<String> = oapp_ids
        .iter()
        .filter_map(|id| OAppId::parse(id).ok())
        .map(|id| id.endpoint_id().to_string())
        .collect();
    json!({ "ids": ids, "localEids": local_eids })
}

#[async_trait]
impl ConfigBatchLoader for GraphqlBatchLoader {
    async fn fetch_batch(&self, oapp_ids: &[String]) -> Result<ConfigBatch, LoaderError> {
        debug!("[oapp-02] GraphQL batch for {} OApps", oapp_ids.len());
        let data: BatchData = self.query(BATCH_QUERY, batch_variables(oapp_ids)).await?;
        Ok(data.into_batch())
    }
}

#[async_trait]
impl DefaultConfigDirectory for GraphqlBatchLoader {
    async fn default_config_oapps(&self, limit: usize) -> Result<Vec<RankedOApp>, LoaderError> {
        let data: DefaultConfigData = self.query(DEFAULT_CONFIG_QUERY, json!({})).await?;
        Ok(data.into_ranked(limit))
    }
}
