//! # Explorer Configuration
//!
//! One configuration value per explorer instance, passed into each
//! component's constructor. Nothing here is global, so independent crawls
//! can run side by side with different settings.
//!
//! ## Config File Format
//!
//! Every section and field is optional; missing values take the defaults.
//!
//! ```toml
//! [resolver.tracked_libraries]
//! 30101 = "0xc02ab410f0734efa3f14628780e6e695156024c2"
//!
//! [crawl]
//! default_depth = 10
//! fail_fast = false
//!
//! [analyzer]
//! dead_dvn_markers = ["dead"]
//!
//! [analyzer.dvn_aliases]
//! "0x589dedbd617e0cbcb916a9223f4d1300c294236b" = "LayerZero Labs"
//!
//! [layout]
//! max_nodes_per_column = 12
//!
//! [loader]
//! endpoint = "http://localhost:8080/v1/graphql"
//! timeout_secs = 30
//! ```

use crate::address::normalize_address;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Hard upper bound on crawl depth.
pub const HARD_MAX_DEPTH: u32 = 20;

/// Default crawl depth.
pub const DEFAULT_CRAWL_DEPTH: u32 = 10;

/// Complete explorer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Resolver configuration.
    pub resolver: ResolverConfig,
    /// Crawler configuration.
    pub crawl: CrawlConfig,
    /// Analyzer configuration.
    pub analyzer: AnalyzerConfig,
    /// Layout configuration.
    pub layout: LayoutConfig,
    /// Upstream loader configuration.
    pub loader: LoaderConfig,
}

impl ExplorerConfig {
    /// Parse from TOML text and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: ExplorerConfig = toml::from_str(text)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Lowercase/normalize addresses used as lookup keys.
    fn normalize(&mut self) {
        self.resolver.tracked_libraries = self
            .resolver
            .tracked_libraries
            .iter()
            .map(|(eid, lib)| {
                let lib = normalize_address(lib).unwrap_or_else(|_| lib.to_ascii_lowercase());
                (eid.trim().to_string(), lib)
            })
            .collect();
        self.analyzer.dvn_aliases = self
            .analyzer
            .dvn_aliases
            .iter()
            .map(|(addr, name)| {
                let addr = normalize_address(addr).unwrap_or_else(|_| addr.to_ascii_lowercase());
                (addr, name.clone())
            })
            .collect();
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.max_depth > HARD_MAX_DEPTH {
            return Err(ConfigError::InvalidValue {
                field: "crawl.max_depth",
                reason: format!("must be <= {}", HARD_MAX_DEPTH),
            });
        }
        if self.crawl.default_depth > self.crawl.max_depth {
            return Err(ConfigError::InvalidValue {
                field: "crawl.default_depth",
                reason: format!("must be <= crawl.max_depth ({})", self.crawl.max_depth),
            });
        }
        if self.layout.max_nodes_per_column == 0 {
            return Err(ConfigError::InvalidValue {
                field: "layout.max_nodes_per_column",
                reason: "must be > 0".to_string(),
            });
        }
        if self.layout.max_columns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "layout.max_columns",
                reason: "must be > 0".to_string(),
            });
        }
        if self.loader.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "loader.timeout_secs",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Tracked canonical receive library per local endpoint id.
    pub tracked_libraries: BTreeMap<String, String>,
}

impl ResolverConfig {
    /// Add a tracked library for an endpoint.
    #[must_use]
    pub fn with_tracked_library(mut self, eid: &str, library: &str) -> Self {
        let lib = normalize_address(library).unwrap_or_else(|_| library.to_ascii_lowercase());
        self.tracked_libraries.insert(eid.to_string(), lib);
        self
    }

    /// Tracked library of an endpoint, if configured.
    pub fn tracked_library(&self, eid: &str) -> Option<&str> {
        self.tracked_libraries.get(eid).map(String::as_str)
    }
}

/// Crawler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Depth used when the caller does not pass one.
    pub default_depth: u32,
    /// Upper bound for requested depths.
    pub max_depth: u32,
    /// Abort on the first failed fetch instead of recording it.
    pub fail_fast: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_CRAWL_DEPTH,
            max_depth: HARD_MAX_DEPTH,
            fail_fast: false,
        }
    }
}

impl CrawlConfig {
    /// Clamp a requested depth to the configured maximum.
    pub fn effective_depth(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_depth)
            .min(self.max_depth)
            .min(HARD_MAX_DEPTH)
    }
}

/// Analyzer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Human-readable DVN names by normalized address.
    pub dvn_aliases: BTreeMap<String, String>,
    /// Label substrings marking a disabled DVN.
    pub dead_dvn_markers: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            dvn_aliases: BTreeMap::new(),
            dead_dvn_markers: vec!["dead".to_string()],
        }
    }
}

impl AnalyzerConfig {
    /// Add a DVN alias.
    #[must_use]
    pub fn with_alias(mut self, address: &str, name: &str) -> Self {
        let addr = normalize_address(address).unwrap_or_else(|_| address.to_ascii_lowercase());
        self.dvn_aliases.insert(addr, name.to_string());
        self
    }
}

/// Layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Outer margin.
    pub margin: f64,
    /// Horizontal distance between columns.
    pub column_spacing: f64,
    /// Node cap per column before it splits.
    pub max_nodes_per_column: usize,
    /// Maximum number of columns after splitting.
    pub max_columns: usize,
    /// Maximum vertical jitter.
    pub jitter: f64,
    /// Horizontal arc strength.
    pub curvature: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            margin: 60.0,
            column_spacing: 220.0,
            max_nodes_per_column: 12,
            max_columns: 24,
            jitter: 12.0,
            curvature: 40.0,
        }
    }
}

/// Upstream loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1/graphql".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}
