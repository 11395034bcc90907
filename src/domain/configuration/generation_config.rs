//! Static configuration for the generation pipeline.

use serde::Deserialize;
use url::Url;

use crate::domain::configuration::{AspectRatio, OutputFormat, Resolution};
use crate::domain::error::AppError;

/// Everything the job client and poller need to talk to the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Generation API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: Url,
    /// Provider model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub output_format: OutputFormat,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay between status polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum number of status polls before giving up.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            aspect_ratio: AspectRatio::default(),
            resolution: Resolution::default(),
            output_format: OutputFormat::default(),
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.model.trim().is_empty() {
            return Err(AppError::InvalidConfig("model must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(AppError::InvalidConfig(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_poll_attempts == 0 {
            return Err(AppError::InvalidConfig(
                "max_poll_attempts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_base() -> Url {
    Url::parse("https://api.kie.ai/api/v1").expect("Default API base URL must be valid")
}

fn default_model() -> String {
    "nano-banana-pro".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_max_poll_attempts() -> u32 {
    60
}
