//! # DVN Labels and Policy Fingerprints
//!
//! Two routes share a fingerprint iff they require the same number of DVNs,
//! the same labelled DVN set and the same sentinel usage. Labels go through
//! the alias table first, so two deployments of one operator compare equal
//! when both are aliased to the same name.

use sha2::{Digest, Sha256};
use shared_types::normalize_address;
use std::collections::BTreeMap;

const FINGERPRINT_HEX_LEN: usize = 16;

/// Alias of a DVN, else its normalized address; lowercased.
pub fn dvn_label(address: &str, aliases: &BTreeMap<String, String>) -> String {
    let normalized =
        normalize_address(address).unwrap_or_else(|_| address.trim().to_ascii_lowercase());
    match aliases.get(&normalized) {
        Some(alias) => alias.to_lowercase(),
        None => normalized,
    }
}

/// Sorted labels of a DVN list.
pub fn dvn_labels(addresses: &[String], aliases: &BTreeMap<String, String>) -> Vec<String> {
    let mut labels: Vec<String> = addresses.iter().map(|a| dvn_label(a, aliases)).collect();
    labels.sort();
    labels
}

/// First 16 hex chars of SHA-256 over `(count, labels, sentinel)`.
pub fn fingerprint(required_count: Option<u32>, labels: &[String], sentinel: bool) -> String {
    let count = required_count.map(|c| c.to_string()).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(count.as_bytes());
    hasher.update(b"|");
    hasher.update(labels.join(",").as_bytes());
    hasher.update(b"|");
    hasher.update(if sentinel { b"1" } else { b"0" });

    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(FINGERPRINT_HEX_LEN);
    digest
}
