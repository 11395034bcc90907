use std::io;

use thiserror::Error;

use crate::domain::generation::GenerationError;

/// Library-wide error type for xiaobao operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// A configuration value is out of range or not an accepted option.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `.xiaobao/config.toml` already exists.
    #[error(".xiaobao/config.toml already exists")]
    ConfigExists,

    /// Scene template lookup failed.
    #[error("Template '{0}' not found. Run 'xiaobao templates' to list available scenes.")]
    TemplateNotFound(String),

    /// A required poster field is blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// The assembled prompt exceeds the provider's size limit.
    #[error("Prompt is too long ({length} characters, limit {limit})")]
    PromptTooLong { length: usize, limit: usize },

    /// Rendering the poster prompt template failed.
    #[error("Failed to render poster prompt: {0}")]
    PromptRender(String),

    /// Generation pipeline failure.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Saving a result image to disk failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Embedded template asset parsing error.
    #[error("Template asset parse error: {0}")]
    TemplateParse(#[from] serde_yaml::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}
