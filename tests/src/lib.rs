//! # OApp Explorer Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Synthetic upstream snapshots
//! └── integration/      # Resolver -> crawler -> analyzer flows
//!     ├── scenarios.rs  # Reference scenarios
//!     └── pipeline.rs   # Persistence, determinism, completeness
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p oapp-tests
//! cargo bench -p oapp-tests
//! ```

pub mod fixtures;
pub mod integration;
