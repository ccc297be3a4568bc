//! # Peer Interpretation
//!
//! Classifies the peer registered for a route into a [`PeerStateHint`].
//!
//! | Input                                  | Hint               | Peer            |
//! |----------------------------------------|--------------------|-----------------|
//! | no registration, no stored peer        | `implicit-blocked` | `ZERO_ADDRESS`  |
//! | registration without a peer value      | `not-configured`   | none            |
//! | zero, zero bytes32 or dead             | `explicit-blocked` | canonical value |
//! | learned from a delivered packet only   | `auto-discovered`  | canonical value |
//! | anything else                          | `explicit`         | canonical value |

use shared_types::{resolve_peer, OAppId, PeerRecord, PeerStateHint, ZERO_ADDRESS};

/// Interpreted peer of one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInterpretation {
    /// Canonical peer value.
    pub peer: Option<String>,
    /// Peer as `<eid>_<address>` when it resolved.
    pub peer_oapp_id: Option<String>,
    /// Whether the peer normalized to an address.
    pub resolved: bool,
    /// Interpretation.
    pub hint: PeerStateHint,
}

/// Interpret the peer of the route from `eid`.
///
/// `record` is the OApp's registration for `eid`, if any. `stored_peer` is
/// consulted only when there is no registration (materialized rows carry
/// their own peer column).
pub fn interpret_peer(
    eid: &str,
    record: Option<&PeerRecord>,
    stored_peer: Option<&str>,
) -> PeerInterpretation {
    let raw = match record {
        Some(rec) => rec.peer.as_deref(),
        None => stored_peer,
    }
    .map(str::trim)
    .filter(|p| !p.is_empty());

    let Some(raw) = raw else {
        return if record.is_some() {
            PeerInterpretation {
                peer: None,
                peer_oapp_id: None,
                resolved: false,
                hint: PeerStateHint::NotConfigured,
            }
        } else {
            PeerInterpretation {
                peer: Some(ZERO_ADDRESS.to_string()),
                peer_oapp_id: None,
                resolved: false,
                hint: PeerStateHint::ImplicitBlocked,
            }
        };
    };

    let resolution = resolve_peer(raw);
    let peer_oapp_id = resolution
        .address
        .as_deref()
        .and_then(|addr| OAppId::new(eid, addr).ok())
        .map(|id| id.to_string());

    let hint = if resolution.blocking {
        PeerStateHint::ExplicitBlocked
    } else if record.is_some_and(|rec| rec.from_packet_delivered) {
        PeerStateHint::AutoDiscovered
    } else {
        PeerStateHint::Explicit
    };

    PeerInterpretation {
        resolved: peer_oapp_id.is_some(),
        peer: Some(resolution.peer),
        peer_oapp_id,
        hint,
    }
}
