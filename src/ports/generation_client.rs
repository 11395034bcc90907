//! Generation API client port definition.

use crate::domain::configuration::{AspectRatio, OutputFormat, Resolution};
use crate::domain::generation::{GenerationError, TaskId, TaskSnapshot};

/// Parameters for one image-generation task.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// Fully assembled prompt document.
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub output_format: OutputFormat,
}

/// Port for the remote generation service.
///
/// One method call is one HTTP request; the bounded poll loop lives in the
/// `PollingGenerator` wrapper.
pub trait GenerationClient {
    /// Create a remote task and return the provider-assigned id.
    fn create_task(&self, request: &TaskRequest) -> Result<TaskId, GenerationError>;

    /// Read one status snapshot for an in-flight task.
    fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot, GenerationError>;
}
