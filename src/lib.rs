//! xiaobao: generate illustrated children's literacy posters from scene
//! templates via the Kie.ai image generation API.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

pub use app::api::{
    GenerateOptions, GenerateResult, clear_credential, credential_status, generate,
    init_workspace, list_templates, set_credential,
};
pub use domain::AppError;
