//! # Topic Diagnostics Test Suite
//!
//! Cross-crate tests for the diagnosed endpoint adapters.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Instrumented updater, manual clock, bus
//! └── integration/
//!     ├── properties.rs # Registration lifecycle guarantees
//!     ├── sequences.rs  # Randomised re-subscribe sequences (proptest)
//!     └── reporting.rs  # Reports published on /diagnostics, metrics
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p diag-tests
//!
//! # By category
//! cargo test -p diag-tests integration::properties::
//! cargo test -p diag-tests integration::sequences::
//! ```

pub mod fixtures;
pub mod integration;
