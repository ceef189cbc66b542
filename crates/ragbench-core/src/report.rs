//! JSON persistence for experiment results.
//!
//! The retrieval stage writes a batch of [`ExperimentResults`] as a JSON
//! array; the harness loads that file, attaches evaluation scores, and
//! writes the evaluated batch back out under a timestamped name so repeated
//! runs never clobber each other.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::PersistError;
use crate::results::ExperimentResults;

/// Filename timestamp format, second precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Writes a batch of experiment results to `results_<timestamp>.json`
/// under `dir`, creating the directory if needed.
///
/// Returns the path written.
pub fn save_results(
    results: &[ExperimentResults],
    dir: &Path,
) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(dir)?;

    let stamp = Local::now().format(TIMESTAMP_FORMAT);
    let path = dir.join(format!("results_{stamp}.json"));
    let json = serde_json::to_string_pretty(results)?;
    fs::write(&path, json)?;

    info!(path = %path.display(), batches = results.len(), "Saved results");
    Ok(path)
}

/// Loads a previously saved batch of experiment results.
pub fn load_results(path: &Path) -> Result<Vec<ExperimentResults>, PersistError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
