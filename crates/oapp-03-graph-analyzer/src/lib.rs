//! # OApp-03 Graph Analyzer
//!
//! Security analysis and layout of a finished crawl.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Analysis
//!
//! | Output | Rule |
//! |--------|------|
//! | blocked edge | blocked peer, dead required DVN or no receive library |
//! | dominant policy | largest fingerprint group of healthy edges, first seen wins ties |
//! | differing edge | healthy edge whose fingerprint is not the dominant one |
//! | blocked node | all inbound edges blocked, or tracked with no configured route |
//!
//! ## Module Structure
//!
//! ```text
//! oapp-03-graph-analyzer/
//! ├── domain/          # EdgeSecurity, DominantCombination, GraphAnalysis, NodePosition
//! ├── algorithms/      # fingerprint, classify, dominant, blocked, layout
//! ├── ports/           # GraphAnalysisApi
//! └── service.rs       # GraphAnalyzer
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::{
    blocked_nodes, classify_edge, compare_to_dominant, dominant_combination, dvn_label, dvn_labels,
    fingerprint, layout_graph,
};
pub use domain::{
    AnalysisSummary, DifferenceReason, DominantCombination, EdgeSecurity, GraphAnalysis,
    LayoutError, NodePosition,
};
pub use ports::GraphAnalysisApi;
pub use service::GraphAnalyzer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
