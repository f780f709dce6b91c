//! Persisted state inspection.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use shield_core::error::Result;
use shield_core::persistence::PERSISTED_LEN;
use shield_core::state::ShieldState;

/// Decoded persisted fields of one projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateSummary {
    /// Field is down.
    pub broken: bool,
    /// Accumulated stress.
    pub buildup: f32,
    /// Radius multiplier.
    pub radius_scale: f32,
    /// Power adequacy indicator.
    pub warmup: f32,
    /// Charge buffer fill indicator.
    pub heat_level: f32,
}

impl From<&ShieldState> for StateSummary {
    fn from(state: &ShieldState) -> Self {
        Self {
            broken: state.broken,
            buildup: state.buildup,
            radius_scale: state.radius_scale,
            warmup: state.warmup,
            heat_level: state.heat_level,
        }
    }
}

impl fmt::Display for StateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "broken:       {}", self.broken)?;
        writeln!(f, "buildup:      {}", self.buildup)?;
        writeln!(f, "radius_scale: {}", self.radius_scale)?;
        writeln!(f, "warmup:       {}", self.warmup)?;
        write!(f, "heat_level:   {}", self.heat_level)
    }
}

/// Decode a persisted state blob.
///
/// # Errors
///
/// Returns an error unless `bytes` is exactly one valid state.
pub fn inspect_bytes(bytes: &[u8]) -> Result<StateSummary> {
    let state = ShieldState::from_bytes(bytes)?;
    Ok(StateSummary::from(&state))
}

/// Read and decode a persisted state file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid state.
pub fn inspect_file(path: &Path) -> Result<StateSummary> {
    let bytes = std::fs::read(path)?;
    tracing::debug!(
        file = %path.display(),
        len = bytes.len(),
        expected = PERSISTED_LEN,
        "Inspecting state"
    );
    inspect_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_core::error::ShieldError;

    #[test]
    fn test_inspect_known_bytes() {
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&12.5f32.to_be_bytes());
        bytes.extend_from_slice(&1.0f32.to_be_bytes());
        bytes.extend_from_slice(&0.95f32.to_be_bytes());
        bytes.extend_from_slice(&0.0f32.to_be_bytes());

        let summary = inspect_bytes(&bytes).unwrap();

        assert!(!summary.broken);
        assert_eq!(summary.buildup, 12.5);
        assert_eq!(summary.warmup, 0.95);
        assert!(summary.to_string().contains("buildup:      12.5"));
    }

    #[test]
    fn test_inspect_rejects_wrong_length() {
        let err = inspect_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, ShieldError::Persistence(_)));
    }

    #[test]
    fn test_inspect_file_roundtrip() {
        let mut state = ShieldState::new();
        state.buildup = 77.0;
        let path = std::env::temp_dir().join(format!("shield_state_{}.bin", std::process::id()));
        std::fs::write(&path, state.to_bytes().unwrap()).unwrap();

        let summary = inspect_file(&path).unwrap();

        assert!(summary.broken);
        assert_eq!(summary.buildup, 77.0);
    }
}
