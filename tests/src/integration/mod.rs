//! # Integration Flows
//!
//! Resolver (01) feeds the crawler (02), whose result the analyzer (03)
//! classifies. These tests drive the real services end to end over
//! in-memory snapshots.

pub mod pipeline;
pub mod scenarios;
