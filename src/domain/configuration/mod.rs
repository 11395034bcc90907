mod generation_config;
mod loader;
mod options;

pub use generation_config::GenerationConfig;
pub use loader::{API_BASE_ENV, API_KEY_ENV, CONFIG_FILE, WORKSPACE_DIR, config_path, load_config};
pub use options::{AspectRatio, OutputFormat, Resolution};
