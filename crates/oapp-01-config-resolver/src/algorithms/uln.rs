//! # ULN Parameter Layering
//!
//! DVN parameters are layered atomically: an override that sets any DVN
//! field replaces the default DVN set in full, otherwise the default set is
//! used in full. Mixing a default required set with an override optional set
//! would describe a policy nobody configured.
//!
//! Confirmations are layered on their own.

use shared_types::{
    normalize_address, FallbackField, UlnConfigRow, CONFIRMATIONS_SENTINEL, REQUIRED_DVN_SENTINEL,
};

/// Effective ULN parameters of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveUln {
    /// Block confirmations.
    pub confirmations: Option<u64>,
    /// Required DVN count, possibly the sentinel.
    pub required_dvn_count: Option<u32>,
    /// Required DVN addresses (empty under the sentinel).
    pub required_dvns: Vec<String>,
    /// Optional DVN count.
    pub optional_dvn_count: Option<u32>,
    /// Optional DVN addresses.
    pub optional_dvns: Vec<String>,
    /// Optional DVN quorum.
    pub optional_dvn_threshold: Option<u32>,
    /// Required count holds the sentinel.
    pub uses_required_dvn_sentinel: bool,
    /// Fields taken from the default.
    pub fallback_fields: Vec<FallbackField>,
}

fn normalize_dvns(dvns: &[String]) -> Vec<String> {
    dvns.iter()
        .map(|d| normalize_address(d).unwrap_or_else(|_| d.trim().to_ascii_lowercase()))
        .collect()
}

fn confirmations_of(row: Option<&UlnConfigRow>) -> Option<u64> {
    match row?.confirmations? {
        0 => None,
        CONFIRMATIONS_SENTINEL => Some(0),
        n => Some(n),
    }
}

/// Layer an OApp override over the chain default.
pub fn layer_uln(override_row: Option<&UlnConfigRow>, default_row: Option<&UlnConfigRow>) -> EffectiveUln {
    let mut out = EffectiveUln::default();

    match confirmations_of(override_row) {
        Some(n) => out.confirmations = Some(n),
        None => {
            out.confirmations = confirmations_of(default_row);
            out.fallback_fields.push(FallbackField::Confirmations);
        }
    }

    let dvn_source = match override_row {
        Some(row) if row.has_dvn_override() => Some(row),
        _ => {
            out.fallback_fields.extend(FallbackField::DVN_FIELDS);
            default_row
        }
    };

    if let Some(src) = dvn_source {
        let required = normalize_dvns(&src.required_dvns);
        let optional = normalize_dvns(&src.optional_dvns);

        let required_count = src.required_dvn_count.unwrap_or(required.len() as u32);
        if required_count == REQUIRED_DVN_SENTINEL {
            out.uses_required_dvn_sentinel = true;
            out.required_dvn_count = Some(REQUIRED_DVN_SENTINEL);
        } else {
            out.required_dvn_count = Some(required_count);
            out.required_dvns = required;
        }

        out.optional_dvn_count = Some(src.optional_dvn_count.unwrap_or(optional.len() as u32));
        out.optional_dvns = optional;
        out.optional_dvn_threshold = Some(src.optional_dvn_threshold.unwrap_or(0));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(required: &[&str], optional: &[&str], threshold: u32, confirmations: u64) -> UlnConfigRow {
        UlnConfigRow {
            eid: "30102".to_string(),
            confirmations: Some(confirmations),
            required_dvn_count: Some(required.len() as u32),
            required_dvns: required.iter().map(|s| s.to_string()).collect(),
            optional_dvn_count: Some(optional.len() as u32),
            optional_dvns: optional.iter().map(|s| s.to_string()).collect(),
            optional_dvn_threshold: Some(threshold),
        }
    }

    #[test]
    fn test_defaults_only() {
        let default = row(&["0x01", "0x02"], &[], 0, 15);
        let uln = layer_uln(None, Some(&default));

        assert_eq!(uln.confirmations, Some(15));
        assert_eq!(uln.required_dvn_count, Some(2));
        assert_eq!(uln.required_dvns.len(), 2);
        assert_eq!(
            uln.fallback_fields,
            vec![
                FallbackField::Confirmations,
                FallbackField::RequiredCount,
                FallbackField::RequiredDvns,
                FallbackField::OptionalCount,
                FallbackField::OptionalDvns,
                FallbackField::OptionalThreshold,
            ]
        );
    }

    #[test]
    fn test_override_replaces_dvn_set_atomically() {
        let default = row(&["0x01", "0x02"], &["0x03"], 1, 15);
        let mut over = UlnConfigRow {
            eid: "30102".to_string(),
            ..Default::default()
        };
        over.optional_dvns = vec!["0x09".to_string()];
        over.optional_dvn_count = Some(1);
        over.optional_dvn_threshold = Some(1);

        let uln = layer_uln(Some(&over), Some(&default));
        // No per-field merge: the default required set is not carried over.
        assert_eq!(uln.required_dvn_count, Some(0));
        assert!(uln.required_dvns.is_empty());
        assert_eq!(uln.optional_dvns, vec!["0x0000000000000000000000000000000000000009"]);
        assert_eq!(uln.fallback_fields, vec![FallbackField::Confirmations]);
        assert_eq!(uln.confirmations, Some(15));
    }

    #[test]
    fn test_confirmations_override_only() {
        let default = row(&["0x01"], &[], 0, 15);
        let over = UlnConfigRow {
            eid: "30102".to_string(),
            confirmations: Some(64),
            ..Default::default()
        };
        let uln = layer_uln(Some(&over), Some(&default));
        assert_eq!(uln.confirmations, Some(64));
        assert_eq!(uln.required_dvn_count, Some(1));
        assert!(!uln.fallback_fields.contains(&FallbackField::Confirmations));
        assert!(uln.fallback_fields.contains(&FallbackField::RequiredDvns));
    }

    #[test]
    fn test_sentinel_is_kept_distinct_from_zero() {
        let over = UlnConfigRow {
            eid: "30102".to_string(),
            required_dvn_count: Some(REQUIRED_DVN_SENTINEL),
            optional_dvns: vec!["0x01".to_string(), "0x02".to_string()],
            optional_dvn_count: Some(2),
            optional_dvn_threshold: Some(1),
            ..Default::default()
        };
        let uln = layer_uln(Some(&over), None);
        assert!(uln.uses_required_dvn_sentinel);
        assert_eq!(uln.required_dvn_count, Some(REQUIRED_DVN_SENTINEL));
        assert!(uln.required_dvns.is_empty());

        let zero = layer_uln(None, Some(&row(&[], &["0x01"], 1, 1)));
        assert!(!zero.uses_required_dvn_sentinel);
        assert_eq!(zero.required_dvn_count, Some(0));
    }

    #[test]
    fn test_confirmation_sentinel_means_zero() {
        let default = row(&["0x01"], &[], 0, CONFIRMATIONS_SENTINEL);
        assert_eq!(layer_uln(None, Some(&default)).confirmations, Some(0));
    }

    #[test]
    fn test_no_config_at_all() {
        let uln = layer_uln(None, None);
        assert_eq!(uln.required_dvn_count, None);
        assert_eq!(uln.confirmations, None);
        assert!(!uln.uses_required_dvn_sentinel);
    }
}
