use crate::ports::{CredentialStore, TemplateStore};

/// Application context holding dependencies for command execution.
pub struct AppContext<T: TemplateStore, C: CredentialStore> {
    templates: T,
    credentials: C,
}

impl<T: TemplateStore, C: CredentialStore> AppContext<T, C> {
    /// Create a new application context.
    pub fn new(templates: T, credentials: C) -> Self {
        Self { templates, credentials }
    }

    /// Get a reference to the scene template store.
    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Get a reference to the credential store.
    pub fn credentials(&self) -> &C {
        &self.credentials
    }
}
