//! # Domain Module
//!
//! Analysis and layout results.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
