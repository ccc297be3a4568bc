//! # Domain Module
//!
//! Crawl options, cancellation and errors.

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
