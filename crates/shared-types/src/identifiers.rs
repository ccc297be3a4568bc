//! # Identifiers
//!
//! OApp identifiers (`"<endpointId>_<address>"`) and endpoint-id ordering.

use crate::address::normalize_address;
use crate::errors::IdentifierError;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An OApp: an endpoint id plus a normalized 20-byte address.
///
/// Serialized as its text form, e.g.
/// `30101_0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OAppId {
    endpoint_id: String,
    address: String,
}

impl OAppId {
    /// Build an id from parts, normalizing the address.
    pub fn new(endpoint_id: &str, address: &str) -> Result<Self, IdentifierError> {
        let eid = endpoint_id.trim();
        let text = format!("{}_{}", eid, address);
        if !is_valid_endpoint_id(eid) {
            return Err(IdentifierError::InvalidEndpointId {
                id: text,
                eid: eid.to_string(),
            });
        }
        let address = normalize_address(address)
            .map_err(|source| IdentifierError::InvalidAddress { id: text, source })?;
        Ok(Self {
            endpoint_id: eid.to_string(),
            address,
        })
    }

    /// Parse `"<eid>_<address>"`, splitting on the last underscore.
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        let (eid, address) = text
            .trim()
            .rsplit_once('_')
            .ok_or_else(|| IdentifierError::MissingSeparator(text.to_string()))?;
        Self::new(eid, address)
    }

    /// Endpoint id part.
    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    /// Normalized address part.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for OAppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.endpoint_id, self.address)
    }
}

impl FromStr for OAppId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OAppId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OAppId> for String {
    fn from(id: OAppId) -> Self {
        id.to_string()
    }
}

/// Normalize an OApp id string to its canonical text form.
pub fn normalize_oapp_id(text: &str) -> Result<String, IdentifierError> {
    OAppId::parse(text).map(|id| id.to_string())
}

/// Endpoint ids are non-empty decimal strings of any length.
pub fn is_valid_endpoint_id(eid: &str) -> bool {
    !eid.is_empty() && eid.bytes().all(|b| b.is_ascii_digit())
}

/// Order endpoint ids numerically when both parse as integers (arbitrary
/// precision), otherwise lexicographically.
pub fn compare_endpoint_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<BigUint>(), b.trim().parse::<BigUint>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "30101_0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111";

    #[test]
    fn test_parse_round_trip() {
        let id = OAppId::parse(SEED).unwrap();
        assert_eq!(id.endpoint_id(), "30101");
        assert_eq!(id.to_string(), SEED);
    }

    #[test]
    fn test_parse_normalizes_address() {
        let id = OAppId::parse("30102_0x2222").unwrap();
        assert_eq!(
            id.to_string(),
            "30102_0x0000000000000000000000000000000000002222"
        );
    }

    #[test]
    fn test_normalize_then_parse_is_idempotent() {
        for raw in [
            SEED,
            "30110_0xABCDEF",
            "1_0x000000000000000000000000000000000000dEaD",
            "40161_000000000000000000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111",
        ] {
            let once = normalize_oapp_id(raw).unwrap();
            let twice = normalize_oapp_id(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_parse_uses_last_underscore() {
        let err = OAppId::parse("weird_30101_0x11").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidEndpointId { .. }));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            OAppId::parse("30101"),
            Err(IdentifierError::MissingSeparator(_))
        ));
        assert!(matches!(
            OAppId::parse("_0x11"),
            Err(IdentifierError::InvalidEndpointId { .. })
        ));
        assert!(matches!(
            OAppId::parse("30101_0xzz"),
            Err(IdentifierError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let id = OAppId::parse(SEED).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", SEED));
        let back: OAppId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_compare_endpoint_ids_numeric() {
        assert_eq!(compare_endpoint_ids("9", "10"), Ordering::Less);
        assert_eq!(compare_endpoint_ids("30101", "30101"), Ordering::Equal);
        assert_eq!(
            compare_endpoint_ids("18446744073709551617", "18446744073709551616"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_endpoint_ids_falls_back_to_text() {
        assert_eq!(compare_endpoint_ids("abc", "10"), Ordering::Greater);
        assert_eq!(compare_endpoint_ids("a", "b"), Ordering::Less);
    }
}
