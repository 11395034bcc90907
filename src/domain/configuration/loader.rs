//! Configuration loading from the `.xiaobao/` workspace directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::domain::configuration::GenerationConfig;
use crate::domain::error::AppError;

/// Directory holding xiaobao state in the working directory.
pub const WORKSPACE_DIR: &str = ".xiaobao";
/// Configuration file name under [`WORKSPACE_DIR`].
pub const CONFIG_FILE: &str = "config.toml";
/// Environment override for the API base URL.
pub const API_BASE_ENV: &str = "XIAOBAO_API_BASE";
/// Environment override for the API key; wins over the stored credential.
pub const API_KEY_ENV: &str = "XIAOBAO_API_KEY";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    generation: Option<GenerationConfig>,
}

/// Path to the configuration file under `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(WORKSPACE_DIR).join(CONFIG_FILE)
}

/// Load configuration from `.xiaobao/config.toml` under `root`.
///
/// A missing file yields the defaults. `XIAOBAO_API_BASE`, when set, wins
/// over the file. The result is always validated.
pub fn load_config(root: &Path) -> Result<GenerationConfig, AppError> {
    let path = config_path(root);

    let mut config = if path.exists() {
        let raw = fs::read_to_string(&path)?;
        toml::from_str::<ConfigFile>(&raw)?.generation.unwrap_or_default()
    } else {
        GenerationConfig::default()
    };

    if let Ok(base) = env::var(API_BASE_ENV) {
        config.api_base = Url::parse(&base).map_err(|err| {
            AppError::InvalidConfig(format!("{API_BASE_ENV} is not a valid URL: {err}"))
        })?;
    }

    config.validate()?;
    Ok(config)
}
