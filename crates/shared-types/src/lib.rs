//! # Shared Types Crate
//!
//! Domain types shared by the resolver, crawler and analyzer subsystems.
//!
//! ## Contents
//!
//! - **Identifiers**: `OAppId` (`"<eid>_<address>"`), endpoint-id ordering
//! - **Addresses**: canonical hex normalization, zero/dead sentinels
//! - **Entities**: `SecurityConfigEntry` and its enums
//! - **Graph**: `GraphNode`, `GraphEdge`, `CrawlResult` (persisted format)
//! - **Batch**: raw rows crossing the loader boundary
//! - **Config**: `ExplorerConfig`, passed explicitly to every component

pub mod address;
pub mod batch;
pub mod config;
pub mod entities;
pub mod errors;
pub mod graph;
pub mod identifiers;

pub use address::*;
pub use batch::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
pub use graph::*;
pub use identifiers::*;
