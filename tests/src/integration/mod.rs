//! # Integration Tests
//!
//! Diagnosed endpoints wired to a real updater and bus.

pub mod properties;
pub mod reporting;
pub mod sequences;
