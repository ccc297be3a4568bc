//! # Ports Module
//!
//! The resolver is pure: it only exposes an inbound port.

pub mod inbound;

pub use inbound::*;
