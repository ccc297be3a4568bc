//! # Address Normalization
//!
//! Canonical hex-address handling for OApp and peer addresses.
//!
//! Addresses arrive from the indexer in several shapes: checksummed 20-byte
//! hex, lowercase bytes32 peers (`0x000…<20 bytes>`), bare hex without the
//! `0x` prefix, or short values that lost their leading zeros. Everything is
//! folded into `0x` + 40 lowercase hex digits.

use crate::errors::AddressError;
use serde::{Deserialize, Serialize};

/// The 20-byte zero address.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// The conventional "dead" burn address.
pub const DEAD_ADDRESS: &str = "0x000000000000000000000000000000000000dead";

/// The 32-byte zero peer (an explicitly unset peer in bytes32 form).
pub const ZERO_PEER: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

const ADDRESS_HEX_LEN: usize = 40;
const BYTES32_HEX_LEN: usize = 64;

fn strip_hex_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Normalize an address to `0x` + 40 lowercase hex digits.
///
/// Accepts 20-byte or 32-byte hex with or without prefix, in any case.
/// Short input is left-padded with zeros. A bytes32 value is narrowed to its
/// low 20 bytes only when the upper 12 bytes are zero.
pub fn normalize_address(raw: &str) -> Result<String, AddressError> {
    let body = strip_hex_prefix(raw);
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::Malformed(raw.to_string()));
    }

    let lower = body.to_ascii_lowercase();
    if lower.len() <= ADDRESS_HEX_LEN {
        return Ok(format!("0x{:0>40}", lower));
    }
    if lower.len() > BYTES32_HEX_LEN {
        return Err(AddressError::Unresolvable(raw.to_string()));
    }

    let padded = format!("{:0>64}", lower);
    let (high, low) = padded.split_at(BYTES32_HEX_LEN - ADDRESS_HEX_LEN);
    if high.bytes().all(|b| b == b'0') {
        Ok(format!("0x{}", low))
    } else {
        Err(AddressError::Unresolvable(raw.to_string()))
    }
}

/// True for the 20-byte or 32-byte zero value in any accepted spelling.
pub fn is_zero_address(raw: &str) -> bool {
    let body = strip_hex_prefix(raw);
    !body.is_empty() && body.len() <= BYTES32_HEX_LEN && body.bytes().all(|b| b == b'0')
}

/// True for the dead address in any accepted spelling.
pub fn is_dead_address(raw: &str) -> bool {
    normalize_address(raw).is_ok_and(|addr| addr == DEAD_ADDRESS)
}

/// True when a peer value blocks delivery (zero, zero bytes32 or dead).
pub fn is_blocking_peer(raw: &str) -> bool {
    is_zero_address(raw) || is_dead_address(raw)
}

/// Canonical display form of a peer value.
///
/// Zero values keep their width (`ZERO_ADDRESS` vs `ZERO_PEER`), resolvable
/// values become 20-byte addresses, anything else is kept lowercased.
pub fn canonical_peer(raw: &str) -> String {
    let body = strip_hex_prefix(raw);
    if is_zero_address(raw) {
        return if body.len() > ADDRESS_HEX_LEN {
            ZERO_PEER.to_string()
        } else {
            ZERO_ADDRESS.to_string()
        };
    }
    normalize_address(raw).unwrap_or_else(|_| raw.trim().to_ascii_lowercase())
}

/// Outcome of interpreting a raw peer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerResolution {
    /// Canonical peer text (see [`canonical_peer`]).
    pub peer: String,
    /// Normalized 20-byte address when the peer resolved.
    pub address: Option<String>,
    /// Whether the peer could be expressed as an address.
    pub resolved: bool,
    /// Whether the peer is a zero/dead blocking value.
    pub blocking: bool,
}

/// Interpret a raw peer value. Never fails: unresolvable input degrades to
/// `resolved = false`.
pub fn resolve_peer(raw: &str) -> PeerResolution {
    let address = normalize_address(raw).ok();
    PeerResolution {
        peer: canonical_peer(raw),
        resolved: address.is_some(),
        address,
        blocking: is_blocking_peer(raw),
    }
}
