//! Init command: write a default `.xiaobao/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::configuration::config_path;
use crate::domain::error::AppError;

static DEFAULT_CONFIG: &str = include_str!("../../assets/scaffold/config.toml");

/// Write the commented default configuration under `root`.
///
/// Returns the path to the created file; refuses to overwrite an existing
/// configuration.
pub fn execute(root: &Path) -> Result<PathBuf, AppError> {
    let path = config_path(root);
    if path.exists() {
        return Err(AppError::ConfigExists);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}
