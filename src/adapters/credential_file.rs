//! File-backed credential persistence.

use std::fs;
use std::path::PathBuf;

use crate::domain::configuration::WORKSPACE_DIR;
use crate::domain::credential::Credential;
use crate::domain::error::AppError;
use crate::ports::CredentialStore;

const CREDENTIAL_FILE: &str = "credential";

/// Stores the API key as a single line under `.xiaobao/credential`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    root: PathBuf,
}

impl FileCredentialStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the current working directory.
    pub fn current() -> Result<Self, AppError> {
        Ok(Self::new(std::env::current_dir()?))
    }

    fn path(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR).join(CREDENTIAL_FILE)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, AppError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        let credential = Credential::new(raw);
        if credential.as_str().is_empty() {
            return Ok(None);
        }
        Ok(Some(credential))
    }

    fn save(&self, credential: &Credential) -> Result<(), AppError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, format!("{}\n", credential.as_str()))?;
        Ok(())
    }

    fn clear(&self) -> Result<bool, AppError> {
        let path = self.path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }
}
