mod credential_store;
mod generation_client;
mod template_store;

pub use credential_store::CredentialStore;
pub use generation_client::{GenerationClient, TaskRequest};
pub use template_store::TemplateStore;
