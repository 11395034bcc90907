//! Job-side domain types for the remote generation service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Opaque task identifier assigned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote task state as reported by one status poll.
///
/// Only `success` and `fail` are terminal; every other provider value
/// (queued, generating, ...) keeps the poll loop running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Success,
    Fail,
    InProgress(String),
}

impl TaskState {
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "success" => TaskState::Success,
            "fail" => TaskState::Fail,
            other => TaskState::InProgress(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Success | TaskState::Fail)
    }

    /// Provider-facing label, for progress output.
    pub fn label(&self) -> &str {
        match self {
            TaskState::Success => "success",
            TaskState::Fail => "fail",
            TaskState::InProgress(raw) => raw,
        }
    }
}

/// Read-only snapshot of a remote task, refreshed on every poll.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub state: TaskState,
    /// Provider failure code, when the task failed.
    pub fail_code: Option<String>,
    /// Provider failure message, when the task failed.
    pub fail_reason: Option<String>,
    /// Present only on success; empty when the result payload was malformed.
    pub result_urls: Vec<String>,
}

/// Error taxonomy for one generation attempt. Every variant is terminal for
/// the attempt; nothing here is retried automatically.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Missing, placeholder, or provider-rejected API key. User-actionable.
    #[error("{0}")]
    Auth(String),

    /// The provider refused to create the task.
    #[error("Task creation failed: {0}")]
    Submit(String),

    /// The provider marked the task failed.
    #[error("Image generation failed: {0}")]
    Failed(String),

    /// The poll attempt cap was exhausted without a terminal state.
    #[error("Timed out after {attempts} status polls; try again later")]
    Timeout { attempts: u32 },

    /// The caller cancelled the poll loop.
    #[error("Generation cancelled")]
    Cancelled,

    /// Network-level failure talking to the provider.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a body this client cannot read.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// True for credential problems the user can fix.
    pub fn is_auth(&self) -> bool {
        matches!(self, GenerationError::Auth(_))
    }
}

/// Lifecycle events emitted while a generation pipeline runs.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The create-task request is about to be sent.
    Creating,
    /// The provider accepted the task.
    Submitted { task_id: TaskId },
    /// One status poll completed.
    Polling { attempt: u32, state: TaskState },
    /// The task finished with `count` result URLs.
    Completed { count: usize },
}

/// Fan-out of progress events to any number of subscribers.
///
/// Emission is fire-and-forget: a dropped receiver is skipped, so an observer
/// can never block or abort the poll loop.
#[derive(Default)]
pub struct ProgressSink {
    senders: Mutex<Vec<Sender<ProgressEvent>>>,
}

impl ProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new subscriber. Events emitted after this call are delivered
    /// until either side of the channel is dropped.
    pub fn subscribe(&self) -> Receiver<ProgressEvent> {
        let (tx, rx) = channel();
        self.senders.lock().expect("progress sink lock poisoned").push(tx);
        rx
    }

    pub fn emit(&self, event: ProgressEvent) {
        let senders = self.senders.lock().expect("progress sink lock poisoned");
        for sender in senders.iter() {
            let _ = sender.send(event.clone());
        }
    }
}

/// Cooperative cancellation for the poll loop, checked between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
