//! # Receive Library Layering
//!
//! Override beats chain default; zero values count as unset.

use shared_types::{is_zero_address, normalize_address, LibraryStatus};

/// Effective library of a route and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveLibrary {
    /// Normalized library address, if any.
    pub address: Option<String>,
    /// True unless a non-zero override was used.
    pub from_default: bool,
}

fn usable(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() || is_zero_address(raw) {
        return None;
    }
    Some(normalize_address(raw).unwrap_or_else(|_| raw.to_ascii_lowercase()))
}

/// Non-zero override, else non-zero default, else none.
pub fn effective_library(override_lib: Option<&str>, default_lib: Option<&str>) -> EffectiveLibrary {
    match usable(override_lib) {
        Some(address) => EffectiveLibrary {
            address: Some(address),
            from_default: false,
        },
        None => EffectiveLibrary {
            address: usable(default_lib),
            from_default: true,
        },
    }
}

/// Classify a library against the chain's tracked canonical library.
pub fn library_status(library: Option<&str>, tracked: Option<&str>) -> LibraryStatus {
    match (library, tracked) {
        (None, _) => LibraryStatus::Absent,
        (Some(_), None) => LibraryStatus::Unknown,
        (Some(lib), Some(tracked)) if lib.eq_ignore_ascii_case(tracked) => LibraryStatus::Tracked,
        (Some(_), Some(_)) => LibraryStatus::Unsupported,
    }
}
