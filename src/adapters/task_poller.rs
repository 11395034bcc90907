//! Bounded polling loop driving a generation task to completion.

use std::thread;
use std::time::Duration;

use crate::domain::generation::{
    CancelToken, GenerationError, ProgressEvent, ProgressSink, TaskId, TaskState,
};
use crate::ports::{GenerationClient, TaskRequest};

/// Fallback reason when the provider marks a task failed without a message.
const DEFAULT_FAILURE_REASON: &str = "the provider reported no reason";

/// Drives a [`GenerationClient`] through the submit and poll phases.
///
/// Polling is strictly sequential: one request at a time, a fixed interval
/// between attempts, and a hard attempt cap. A transport or protocol error
/// from any single poll terminates the loop immediately; only non-terminal
/// task states keep it running.
pub struct PollingGenerator {
    client: Box<dyn GenerationClient>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl PollingGenerator {
    pub fn new(client: Box<dyn GenerationClient>, poll_interval_ms: u64, max_attempts: u32) -> Self {
        Self {
            client,
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Submit a task and poll it to a terminal state.
    ///
    /// Emits `Creating`, `Submitted`, one `Polling` per attempt, and
    /// `Completed` on success.
    pub fn generate(
        &self,
        request: &TaskRequest,
        progress: &ProgressSink,
        cancel: &CancelToken,
    ) -> Result<Vec<String>, GenerationError> {
        progress.emit(ProgressEvent::Creating);
        let task_id = self.client.create_task(request)?;
        progress.emit(ProgressEvent::Submitted { task_id: task_id.clone() });

        let urls = self.poll_until_done(&task_id, progress, cancel)?;
        progress.emit(ProgressEvent::Completed { count: urls.len() });
        Ok(urls)
    }

    /// Poll one task until success, failure, cancellation, or the attempt cap.
    pub fn poll_until_done(
        &self,
        task_id: &TaskId,
        progress: &ProgressSink,
        cancel: &CancelToken,
    ) -> Result<Vec<String>, GenerationError> {
        for attempt in 1..=self.max_attempts {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }

            let snapshot = self.client.task_status(task_id)?;
            progress.emit(ProgressEvent::Polling { attempt, state: snapshot.state.clone() });

            match snapshot.state {
                TaskState::Success => return Ok(snapshot.result_urls),
                TaskState::Fail => {
                    let reason = snapshot
                        .fail_reason
                        .filter(|reason| !reason.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string());
                    return Err(GenerationError::Failed(reason));
                }
                TaskState::InProgress(_) => {
                    // No sleep after the final attempt.
                    if attempt < self.max_attempts {
                        thread::sleep(self.poll_interval);
                    }
                }
            }
        }

        Err(GenerationError::Timeout { attempts: self.max_attempts })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::generation::TaskSnapshot;

    /// Scripted client: returns canned status responses in order.
    struct SequenceClient {
        status_calls: AtomicUsize,
        responses: Mutex<Vec<Result<TaskSnapshot, GenerationError>>>,
    }

    impl SequenceClient {
        fn new(responses: Vec<Result<TaskSnapshot, GenerationError>>) -> Self {
            Self { status_calls: AtomicUsize::new(0), responses: Mutex::new(responses) }
        }

        fn status_calls(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }
    }

    impl GenerationClient for Arc<SequenceClient> {
        fn create_task(&self, _request: &TaskRequest) -> Result<TaskId, GenerationError> {
            Ok(TaskId::new("task-1"))
        }

        fn task_status(&self, _task_id: &TaskId) -> Result<TaskSnapshot, GenerationError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let mut guard = self.responses.lock().expect("responses lock poisoned");
            if guard.is_empty() {
                return Err(GenerationError::InvalidResponse(
                    "test: unexpected extra poll".to_string(),
                ));
            }
            guard.remove(0)
        }
    }

    fn running() -> Result<TaskSnapshot, GenerationError> {
        Ok(TaskSnapshot {
            state: TaskState::InProgress("running".to_string()),
            fail_code: None,
            fail_reason: None,
            result_urls: vec![],
        })
    }

    fn success(urls: &[&str]) -> Result<TaskSnapshot, GenerationError> {
        Ok(TaskSnapshot {
            state: TaskState::Success,
            fail_code: None,
            fail_reason: None,
            result_urls: urls.iter().map(|url| url.to_string()).collect(),
        })
    }

    fn failure(reason: Option<&str>) -> Result<TaskSnapshot, GenerationError> {
        Ok(TaskSnapshot {
            state: TaskState::Fail,
            fail_code: Some("500".to_string()),
            fail_reason: reason.map(ToOwned::to_owned),
            result_urls: vec![],
        })
    }

    fn request() -> TaskRequest {
        TaskRequest {
            prompt: "poster".to_string(),
            aspect_ratio: Default::default(),
            resolution: Default::default(),
            output_format: Default::default(),
        }
    }

    fn poller(client: &Arc<SequenceClient>, max_attempts: u32) -> PollingGenerator {
        PollingGenerator::new(Box::new(client.clone()), 1, max_attempts)
    }

    fn scripted(responses: Vec<Result<TaskSnapshot, GenerationError>>) -> Arc<SequenceClient> {
        Arc::new(SequenceClient::new(responses))
    }

    #[test]
    fn resolves_with_result_urls_in_order() {
        let client = scripted(vec![running(), running(), success(&["url-a", "url-b"])]);
        let generator = poller(&client, 10);

        let progress = ProgressSink::new();
        let events = progress.subscribe();
        let urls = generator.generate(&request(), &progress, &CancelToken::new()).unwrap();

        assert_eq!(urls, vec!["url-a", "url-b"]);
        assert_eq!(client.status_calls(), 3);

        let collected: Vec<ProgressEvent> = events.try_iter().collect();
        assert!(matches!(collected.first(), Some(ProgressEvent::Creating)));
        assert!(matches!(collected.get(1), Some(ProgressEvent::Submitted { .. })));
        let polls =
            collected.iter().filter(|e| matches!(e, ProgressEvent::Polling { .. })).count();
        assert_eq!(polls, 3);
        assert!(matches!(collected.last(), Some(ProgressEvent::Completed { count: 2 })));
    }

    #[test]
    fn explicit_failure_carries_the_provider_reason() {
        let client = scripted(vec![failure(Some("X"))]);
        let generator = poller(&client, 10);

        let err = generator
            .generate(&request(), &ProgressSink::new(), &CancelToken::new())
            .unwrap_err();

        match err {
            GenerationError::Failed(reason) => assert_eq!(reason, "X"),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn blank_failure_reason_falls_back_to_a_fixed_message() {
        let client = scripted(vec![failure(Some("  "))]);
        let generator = poller(&client, 10);

        let err = generator
            .poll_until_done(&TaskId::new("task-1"), &ProgressSink::new(), &CancelToken::new())
            .unwrap_err();

        match err {
            GenerationError::Failed(reason) => assert_eq!(reason, DEFAULT_FAILURE_REASON),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn attempt_cap_polls_exactly_max_attempts_then_times_out() {
        let client = scripted(vec![running(), running(), running()]);
        let generator = poller(&client, 3);

        let err = generator
            .poll_until_done(&TaskId::new("task-1"), &ProgressSink::new(), &CancelToken::new())
            .unwrap_err();

        assert!(matches!(err, GenerationError::Timeout { attempts: 3 }));
        assert_eq!(client.status_calls(), 3);
    }

    #[test]
    fn transport_error_terminates_without_further_polls() {
        let client = scripted(vec![
            Err(GenerationError::Transport("connection reset".to_string())),
            running(),
        ]);
        let generator = poller(&client, 10);

        let err = generator
            .poll_until_done(&TaskId::new("task-1"), &ProgressSink::new(), &CancelToken::new())
            .unwrap_err();

        assert!(matches!(err, GenerationError::Transport(_)));
        assert_eq!(client.status_calls(), 1);
    }

    #[test]
    fn cancellation_short_circuits_before_the_next_poll() {
        let client = scripted(vec![running(), running()]);
        let generator = poller(&client, 10);

        let cancel = CancelToken::new();
        cancel.cancel();

        let err = generator
            .poll_until_done(&TaskId::new("task-1"), &ProgressSink::new(), &cancel)
            .unwrap_err();

        assert!(matches!(err, GenerationError::Cancelled));
        assert_eq!(client.status_calls(), 0);
    }

    #[test]
    fn submit_failure_skips_polling_entirely() {
        struct RejectingClient;
        impl GenerationClient for RejectingClient {
            fn create_task(&self, _request: &TaskRequest) -> Result<TaskId, GenerationError> {
                Err(GenerationError::Submit("quota exceeded".to_string()))
            }

            fn task_status(&self, _task_id: &TaskId) -> Result<TaskSnapshot, GenerationError> {
                panic!("task_status must not be called after a failed submit");
            }
        }

        let generator = PollingGenerator::new(Box::new(RejectingClient), 1, 10);
        let err = generator
            .generate(&request(), &ProgressSink::new(), &CancelToken::new())
            .unwrap_err();

        assert!(matches!(err, GenerationError::Submit(_)));
    }
}
