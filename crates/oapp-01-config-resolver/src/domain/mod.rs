//! # Domain Module
//!
//! Resolver inputs, outputs and errors.

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
