pub mod configuration;
pub mod credential;
pub mod error;
pub mod generation;
pub mod prompt;
pub mod template;

pub use configuration::{
    API_BASE_ENV, API_KEY_ENV, AspectRatio, CONFIG_FILE, GenerationConfig, OutputFormat,
    Resolution, WORKSPACE_DIR, config_path, load_config,
};
pub use credential::{Credential, PLACEHOLDER_KEY};
pub use error::AppError;
pub use generation::{
    CancelToken, GenerationError, ProgressEvent, ProgressSink, TaskId, TaskSnapshot, TaskState,
};
pub use prompt::{MAX_PROMPT_CHARS, build_prompt, is_too_long, parse_vocabulary_input};
pub use template::{SceneTemplate, TemplateSummary, Vocabulary};
