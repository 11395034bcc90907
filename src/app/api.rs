//! API facade for the application.
//!
//! High-level functions that glue together context creation and command
//! execution for the working directory.

use std::path::PathBuf;

use crate::adapters::{EmbeddedTemplateStore, FileCredentialStore};
use crate::app::AppContext;
use crate::app::commands::{auth, generate, init, templates};
use crate::domain::configuration::load_config;
use crate::domain::error::AppError;
use crate::domain::template::TemplateSummary;

pub use crate::app::commands::generate::{GenerateOptions, GenerateResult};

/// Create an `AppContext` rooted at the working directory.
fn create_context() -> Result<AppContext<EmbeddedTemplateStore, FileCredentialStore>, AppError> {
    Ok(AppContext::new(EmbeddedTemplateStore::new()?, FileCredentialStore::current()?))
}

/// List the bundled scene templates.
pub fn list_templates() -> Result<Vec<TemplateSummary>, AppError> {
    let ctx = create_context()?;
    Ok(templates::execute(&ctx))
}

/// Generate a poster using `.xiaobao/config.toml` from the working directory.
pub fn generate(options: GenerateOptions) -> Result<GenerateResult, AppError> {
    let ctx = create_context()?;
    let config = load_config(&std::env::current_dir()?)?;
    generate::execute(&ctx, &config, options)
}

/// Store an API key in `.xiaobao/credential`.
pub fn set_credential(key: &str) -> Result<(), AppError> {
    let ctx = create_context()?;
    auth::set(&ctx, key)
}

/// Masked form of the stored API key, if any.
pub fn credential_status() -> Result<Option<String>, AppError> {
    let ctx = create_context()?;
    auth::show(&ctx)
}

/// Remove the stored API key. Returns whether one was present.
pub fn clear_credential() -> Result<bool, AppError> {
    let ctx = create_context()?;
    auth::clear(&ctx)
}

/// Write a default `.xiaobao/config.toml` in the working directory.
pub fn init_workspace() -> Result<PathBuf, AppError> {
    init::execute(&std::env::current_dir()?)
}
