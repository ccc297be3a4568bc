//! # Ports Layer
//!
//! The analyzer works on a finished crawl and needs no outbound ports.

pub mod inbound;

pub use inbound::GraphAnalysisApi;
