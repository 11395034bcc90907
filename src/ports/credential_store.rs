//! Credential persistence port definition.

use crate::domain::credential::Credential;
use crate::domain::error::AppError;

/// Persistence for the single stored API key.
pub trait CredentialStore {
    /// Read the stored key, if any.
    fn load(&self) -> Result<Option<Credential>, AppError>;

    /// Persist `credential`, replacing any previous value.
    fn save(&self, credential: &Credential) -> Result<(), AppError>;

    /// Remove the stored key. Returns whether a key was present.
    fn clear(&self) -> Result<bool, AppError>;
}
