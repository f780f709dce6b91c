//! # Shield Test Utilities
//!
//! Shared testing utilities for the workspace:
//! - Determinism test harness
//! - Fixtures (configs, volleys, scripted consumers, barrage scenario)
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
