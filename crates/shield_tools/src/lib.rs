//! # Shield Development Tools
//!
//! Command-line tools for development:
//! - Config validation
//! - Headless barrage scenarios
//! - Persisted state inspection

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod inspect;
pub mod scenario;
pub mod validate;
