pub mod credential_file;
pub mod generation_client_http;
pub mod task_poller;
pub mod template_embedded;

pub use credential_file::FileCredentialStore;
pub use generation_client_http::{HttpGenerationClient, fetch_image};
pub use task_poller::PollingGenerator;
pub use template_embedded::EmbeddedTemplateStore;
