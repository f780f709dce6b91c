//! Config validation utilities.

use std::path::{Path, PathBuf};

use shield_core::config::ShieldConfig;
use shield_core::error::Result;

/// Validate a RON config file, or every `.ron` file in a directory.
///
/// Files are checked in name order; the first failure stops the run.
///
/// # Errors
///
/// Returns an error if a file cannot be read, parsed or validated.
pub fn validate_path(path: &Path) -> Result<Vec<(PathBuf, ShieldConfig)>> {
    if !path.is_dir() {
        let config = ShieldConfig::load(path)?;
        return Ok(vec![(path.to_path_buf(), config)]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let file = entry?.path();
        if file.extension().is_some_and(|ext| ext == "ron") {
            files.push(file);
        }
    }
    files.sort();

    files
        .into_iter()
        .map(|file| {
            tracing::debug!(file = %file.display(), "Validating config");
            let config = ShieldConfig::load(&file)?;
            Ok((file, config))
        })
        .collect()
}
