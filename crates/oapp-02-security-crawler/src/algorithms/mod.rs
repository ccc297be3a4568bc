//! # Algorithms Module
//!
//! Edge construction and merging, and the default-config ranking.

pub mod edges;
pub mod ranking;

pub use edges::{block_reason_hint, build_edge, is_stale_peer, merge_edge, route_activity};
pub use ranking::{rank_batch_default_config, rank_default_config_oapps};
