//! Auth commands: manage the stored API key.

use crate::app::AppContext;
use crate::domain::credential::Credential;
use crate::domain::error::AppError;
use crate::ports::{CredentialStore, TemplateStore};

/// Persist a new API key, replacing any previous one.
///
/// Placeholder or blank values are refused so a broken key cannot shadow a
/// working one.
pub fn set<T: TemplateStore, C: CredentialStore>(
    ctx: &AppContext<T, C>,
    raw_key: &str,
) -> Result<(), AppError> {
    let credential = Credential::new(raw_key);
    if credential.is_placeholder() {
        return Err(AppError::config_error(
            "Refusing to store a blank or placeholder API key. Get a real key from https://kie.ai/api-key.",
        ));
    }
    ctx.credentials().save(&credential)
}

/// Masked form of the stored key, if any.
pub fn show<T: TemplateStore, C: CredentialStore>(
    ctx: &AppContext<T, C>,
) -> Result<Option<String>, AppError> {
    Ok(ctx.credentials().load()?.map(|credential| credential.masked()))
}

/// Remove the stored key. Returns whether one was present.
pub fn clear<T: TemplateStore, C: CredentialStore>(
    ctx: &AppContext<T, C>,
) -> Result<bool, AppError> {
    ctx.credentials().clear()
}
