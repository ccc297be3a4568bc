//! # Algorithms Module
//!
//! Edge classification, dominant policy, blocked nodes and layout.

pub mod blocked;
pub mod classify;
pub mod dominant;
pub mod fingerprint;
pub mod layout;

pub use blocked::blocked_nodes;
pub use classify::{classify_edge, compare_to_dominant};
pub use dominant::dominant_combination;
pub use fingerprint::{dvn_label, dvn_labels, fingerprint};
pub use layout::layout_graph;
