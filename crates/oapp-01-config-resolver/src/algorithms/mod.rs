//! # Algorithms Module
//!
//! Layering rules for one route: receive library, ULN parameters and peer.

pub mod library;
pub mod peer;
pub mod uln;

pub use library::{effective_library, library_status, EffectiveLibrary};
pub use peer::{interpret_peer, PeerInterpretation};
pub use uln::{layer_uln, EffectiveUln};
