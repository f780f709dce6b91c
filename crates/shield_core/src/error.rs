//! Error types for the shield simulation.
//!
//! Power exhaustion and structural overload are not errors: both are
//! modeled as transitions into the broken state. What remains are the
//! boundaries with storage and configuration.

use thiserror::Error;

/// Result type alias using [`ShieldError`].
pub type Result<T> = std::result::Result<T, ShieldError>;

/// Top-level error type for the shield core.
#[derive(Debug, Error)]
pub enum ShieldError {
    /// Persisted shield state could not be read or written.
    #[error("Persisted shield state is unreadable: {0}")]
    Persistence(String),

    /// Configuration text failed to parse.
    #[error("Failed to parse shield config: {0}")]
    ConfigParse(String),

    /// A configuration value is out of range.
    #[error("Invalid shield config field '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Configuration file IO failed.
    #[error("Failed to read shield config: {0}")]
    Io(#[from] std::io::Error),

    /// A host operation referenced a projector that is not registered.
    #[error("Projector not found: {0}")]
    UnknownProjector(u64),
}
