//! # Route Security Entities
//!
//! The effective security policy of one route (remote endpoint → local
//! OApp), as produced by the resolver and embedded in crawl output.

use serde::{Deserialize, Serialize};

/// Reserved required-DVN count meaning "no required DVNs, the optional
/// quorum alone verifies". Distinct from a configured zero, which means
/// "inherit the default".
pub const REQUIRED_DVN_SENTINEL: u32 = u8::MAX as u32;

/// Reserved confirmation count meaning "zero confirmations" (a stored zero
/// means "inherit the default").
pub const CONFIRMATIONS_SENTINEL: u64 = u64::MAX;

/// How the effective receive library relates to the chain's tracked library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryStatus {
    /// The tracked canonical library; DVN parameters are meaningful.
    Tracked,
    /// Some other non-zero library.
    Unsupported,
    /// No receive library at all.
    #[serde(rename = "none")]
    Absent,
    /// No canonical library known for the chain, or not reported.
    #[default]
    Unknown,
}

/// Where a route's config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    /// Stored by the indexer for this OApp.
    #[serde(rename = "materialized")]
    Materialized,
    /// Derived from chain defaults.
    #[serde(rename = "default")]
    DefaultDerived,
}

/// Interpretation of a route's peer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeerStateHint {
    /// Peer configured to a live address.
    Explicit,
    /// Peer only learned from inbound traffic.
    AutoDiscovered,
    /// Peer configured to zero/dead.
    ExplicitBlocked,
    /// No peer registration at all.
    ImplicitBlocked,
    /// Registration present without a peer value.
    NotConfigured,
}

impl PeerStateHint {
    /// Whether the hint blocks delivery on its own.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::ExplicitBlocked | Self::ImplicitBlocked)
    }

    /// Whether the route counts as configured for inbound delivery.
    pub fn is_configured(&self) -> bool {
        matches!(
            self,
            Self::Explicit | Self::AutoDiscovered | Self::ExplicitBlocked
        )
    }
}

/// A field whose effective value came from the chain defaults.
///
/// Declaration order is the canonical order used in `fallbackFields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FallbackField {
    /// Receive library.
    #[serde(rename = "library")]
    Library,
    /// Block confirmations.
    #[serde(rename = "confirmations")]
    Confirmations,
    /// Required DVN count.
    #[serde(rename = "requiredCount")]
    RequiredCount,
    /// Required DVN list.
    #[serde(rename = "requiredDVNs")]
    RequiredDvns,
    /// Optional DVN count.
    #[serde(rename = "optionalCount")]
    OptionalCount,
    /// Optional DVN list.
    #[serde(rename = "optionalDVNs")]
    OptionalDvns,
    /// Optional DVN threshold.
    #[serde(rename = "optionalThreshold")]
    OptionalThreshold,
}

impl FallbackField {
    /// All DVN-parameter fields, which fall back together.
    pub const DVN_FIELDS: [FallbackField; 5] = [
        Self::RequiredCount,
        Self::RequiredDvns,
        Self::OptionalCount,
        Self::OptionalDvns,
        Self::OptionalThreshold,
    ];
}

/// Sort into canonical order and drop duplicates.
pub fn canonicalize_fallback_fields(fields: &mut Vec<FallbackField>) {
    fields.sort();
    fields.dedup();
}

/// Why a route cannot deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockReason {
    /// Peer set to zero/dead.
    ExplicitBlocked,
    /// Peer never registered.
    ImplicitBlocked,
    /// No usable receive library.
    NoLibrary,
    /// A required DVN is a dead/disabled marker.
    DeadDvn,
}

impl BlockReason {
    /// Block reason implied by a peer hint, if any.
    pub fn from_peer_hint(hint: PeerStateHint) -> Option<Self> {
        match hint {
            PeerStateHint::ExplicitBlocked => Some(Self::ExplicitBlocked),
            PeerStateHint::ImplicitBlocked => Some(Self::ImplicitBlocked),
            _ => None,
        }
    }
}

/// Effective security config of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfigEntry {
    /// Remote (sending) endpoint id.
    pub source_endpoint_id: String,
    /// Endpoint id of the receiving OApp.
    pub local_endpoint_id: String,
    /// Effective receive library address.
    pub effective_receive_library: Option<String>,
    /// Effective block confirmations (tracked library only).
    pub effective_confirmations: Option<u64>,
    /// Required DVN addresses.
    #[serde(rename = "requiredDVNs", default)]
    pub required_dvns: Vec<String>,
    /// Required DVN count, or [`REQUIRED_DVN_SENTINEL`].
    #[serde(rename = "requiredDVNCount")]
    pub required_dvn_count: Option<u32>,
    /// Optional DVN addresses.
    #[serde(rename = "optionalDVNs", default)]
    pub optional_dvns: Vec<String>,
    /// Optional DVN count.
    #[serde(rename = "optionalDVNCount")]
    pub optional_dvn_count: Option<u32>,
    /// Optional DVN quorum.
    #[serde(rename = "optionalDVNThreshold")]
    pub optional_dvn_threshold: Option<u32>,
    /// Whether the required count holds the sentinel.
    #[serde(rename = "usesRequiredDVNSentinel", default)]
    pub uses_required_dvn_sentinel: bool,
    /// Library status.
    #[serde(default)]
    pub library_status: LibraryStatus,
    /// Provenance of the row.
    pub source_type: SourceType,
    /// Whether the row was synthesized from defaults.
    #[serde(default)]
    pub synthetic: bool,
    /// Fields inherited from chain defaults, canonical order.
    #[serde(default)]
    pub fallback_fields: Vec<FallbackField>,
    /// Canonical peer value.
    pub peer: Option<String>,
    /// Peer as an OApp id, when it resolved.
    #[serde(rename = "peerOAppId")]
    pub peer_oapp_id: Option<String>,
    /// Whether the peer normalized to an address.
    #[serde(default)]
    pub peer_resolved: bool,
    /// Interpretation of the peer registration.
    pub peer_state_hint: PeerStateHint,
}

impl SecurityConfigEntry {
    /// Whether the required DVN count holds the reserved sentinel.
    pub fn has_sentinel_count(&self) -> bool {
        self.required_dvn_count == Some(REQUIRED_DVN_SENTINEL)
    }
}
