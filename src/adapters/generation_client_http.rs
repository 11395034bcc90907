//! Generation API client implementation using reqwest.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::domain::configuration::GenerationConfig;
use crate::domain::credential::Credential;
use crate::domain::generation::{GenerationError, TaskId, TaskSnapshot, TaskState};
use crate::ports::{GenerationClient, TaskRequest};

const CREATE_TASK_PATH: &str = "jobs/createTask";
const RECORD_INFO_PATH: &str = "jobs/recordInfo";

const PROVIDER_OK: i64 = 200;
const PROVIDER_UNAUTHORIZED: i64 = 401;

const MAX_BODY_SNIPPET_CHARS: usize = 256;

/// HTTP transport for the Kie.ai generation API.
///
/// Performs a single request per call; the bounded poll loop lives in the
/// `PollingGenerator` wrapper adapter. A placeholder credential is refused
/// before any network activity.
#[derive(Clone)]
pub struct HttpGenerationClient {
    credential: Credential,
    api_base: Url,
    model: String,
    client: Client,
}

impl std::fmt::Debug for HttpGenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGenerationClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}

impl HttpGenerationClient {
    /// Create a new HTTP client with the given credential and configuration.
    pub fn new(credential: Credential, config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            credential,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            client,
        })
    }

    /// Refuse placeholder credentials before any network I/O.
    fn ensure_credential(&self) -> Result<(), GenerationError> {
        if self.credential.is_placeholder() {
            return Err(GenerationError::Auth(
                "API key is missing or still the placeholder. Run 'xiaobao auth set' or set \
                 XIAOBAO_API_KEY."
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.as_str().trim_end_matches('/'), path)
    }
}

impl GenerationClient for HttpGenerationClient {
    fn create_task(&self, request: &TaskRequest) -> Result<TaskId, GenerationError> {
        self.ensure_credential()?;

        let body = CreateTaskBody {
            model: &self.model,
            input: TaskInput {
                prompt: &request.prompt,
                aspect_ratio: request.aspect_ratio.as_str(),
                resolution: request.resolution.as_str(),
                output_format: request.output_format.as_str(),
            },
        };

        let response = self
            .client
            .post(self.endpoint(CREATE_TASK_PATH))
            .bearer_auth(self.credential.as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .map_err(|e| GenerationError::Transport(format!("Create-task request failed: {e}")))?;

        let data: CreateTaskData = read_envelope(response, GenerationError::Submit)?;

        if data.task_id.is_empty() {
            return Err(GenerationError::InvalidResponse(
                "No task id in create-task response".to_string(),
            ));
        }
        Ok(TaskId::new(data.task_id))
    }

    fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot, GenerationError> {
        self.ensure_credential()?;

        let response = self
            .client
            .get(self.endpoint(RECORD_INFO_PATH))
            .query(&[("taskId", task_id.as_str())])
            .bearer_auth(self.credential.as_str())
            .send()
            .map_err(|e| GenerationError::Transport(format!("Status request failed: {e}")))?;

        let data: RecordInfoData = read_envelope(response, |msg| {
            GenerationError::InvalidResponse(format!("Status query failed: {msg}"))
        })?;

        let state = TaskState::from_provider(&data.state);
        let result_urls = if state == TaskState::Success {
            parse_result_urls(data.result_json.as_deref())
        } else {
            Vec::new()
        };

        Ok(TaskSnapshot {
            state,
            fail_code: data.fail_code.map(json_value_to_string),
            fail_reason: data.fail_msg,
            result_urls,
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateTaskBody<'a> {
    model: &'a str,
    input: TaskInput<'a>,
}

#[derive(Debug, Serialize)]
struct TaskInput<'a> {
    prompt: &'a str,
    aspect_ratio: &'static str,
    resolution: &'static str,
    output_format: &'static str,
}

/// Provider response envelope: `code` is 200 on success, anything else is a
/// rejection with the reason in `msg`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskData {
    #[serde(default)]
    task_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordInfoData {
    #[serde(default)]
    state: String,
    #[serde(default)]
    fail_code: Option<serde_json::Value>,
    #[serde(default)]
    fail_msg: Option<String>,
    /// JSON-encoded string holding `{"resultUrls": [...]}`.
    #[serde(default)]
    result_json: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultPayload {
    #[serde(default)]
    result_urls: Vec<String>,
}

/// Decode a provider envelope. This is the single place responses are
/// classified: auth failures (HTTP 401 or envelope code 401) become
/// `Auth`, other envelope rejections go through `reject`, and undecodable
/// bodies become transport/protocol errors.
fn read_envelope<T: DeserializeOwned>(
    response: Response,
    reject: impl Fn(String) -> GenerationError,
) -> Result<T, GenerationError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| GenerationError::Transport(format!("Failed to read response body: {e}")))?;

    let envelope: Envelope<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            if status == StatusCode::UNAUTHORIZED {
                return Err(GenerationError::Auth(
                    "API key rejected by the provider (HTTP 401). Check 'xiaobao auth show'."
                        .to_string(),
                ));
            }
            if !status.is_success() {
                return Err(GenerationError::Transport(format!(
                    "HTTP {status}: {}",
                    snippet(&body)
                )));
            }
            return Err(GenerationError::InvalidResponse(format!(
                "Failed to decode provider response: {err}"
            )));
        }
    };

    if status == StatusCode::UNAUTHORIZED || envelope.code == PROVIDER_UNAUTHORIZED {
        return Err(GenerationError::Auth(envelope.msg.unwrap_or_else(|| {
            "API key rejected by the provider. Check 'xiaobao auth show'.".to_string()
        })));
    }
    if envelope.code != PROVIDER_OK {
        let msg = envelope.msg.unwrap_or_else(|| format!("provider code {}", envelope.code));
        return Err(reject(msg));
    }

    envelope
        .data
        .ok_or_else(|| GenerationError::InvalidResponse("Provider response has no data".to_string()))
}

/// Extract result URLs from the nested JSON payload.
///
/// Anything malformed or absent degrades to an empty list; a broken result
/// payload must not fail an otherwise successful task.
fn parse_result_urls(result_json: Option<&str>) -> Vec<String> {
    let Some(raw) = result_json else {
        return Vec::new();
    };
    match serde_json::from_str::<ResultPayload>(raw) {
        Ok(payload) => payload.result_urls,
        Err(_) => Vec::new(),
    }
}

fn json_value_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    trimmed.chars().take(MAX_BODY_SNIPPET_CHARS).collect()
}

/// Fetch a result image as raw bytes.
///
/// Result URLs point at public storage; no credential is attached.
pub fn fetch_image(url: &str, timeout_secs: u64) -> Result<Vec<u8>, GenerationError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GenerationError::Transport(format!("Failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| GenerationError::Transport(format!("Image request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(GenerationError::Transport(format!(
            "HTTP {} fetching image",
            response.status()
        )));
    }

    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(|e| GenerationError::Transport(format!("Failed to read image body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration::GenerationConfig;

    fn test_config(base: &str) -> GenerationConfig {
        let mut config = GenerationConfig::default();
        config.api_base = Url::parse(base).unwrap();
        config.timeout_secs = 5;
        config
    }

    fn test_client(base: &str) -> HttpGenerationClient {
        HttpGenerationClient::new(Credential::new("kie-test-key"), &test_config(base)).unwrap()
    }

    fn test_request() -> TaskRequest {
        TaskRequest {
            prompt: "draw a poster".to_string(),
            aspect_ratio: Default::default(),
            resolution: Default::default(),
            output_format: Default::default(),
        }
    }

    #[test]
    fn create_task_returns_provider_task_id() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/jobs/createTask")
            .match_header("authorization", "Bearer kie-test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code": 200, "msg": "success", "data": {"taskId": "task-123"}}"#)
            .expect(1)
            .create();

        let client = test_client(&server.url());
        let task_id = client.create_task(&test_request()).unwrap();

        assert_eq!(task_id.as_str(), "task-123");
        mock.assert();
    }

    #[test]
    fn create_task_sends_the_provider_body_shape() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/jobs/createTask")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "nano-banana-pro",
                "input": {
                    "prompt": "draw a poster",
                    "aspect_ratio": "3:4",
                    "resolution": "2K",
                    "output_format": "png"
                }
            })))
            .with_status(200)
            .with_body(r#"{"code": 200, "data": {"taskId": "task-9"}}"#)
            .expect(1)
            .create();

        let client = test_client(&server.url());
        client.create_task(&test_request()).unwrap();
        mock.assert();
    }

    #[test]
    fn create_task_surfaces_provider_rejection_message() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/jobs/createTask")
            .with_status(200)
            .with_body(r#"{"code": 422, "msg": "prompt rejected by moderation"}"#)
            .create();

        let client = test_client(&server.url());
        let err = client.create_task(&test_request()).unwrap_err();

        match err {
            GenerationError::Submit(msg) => assert_eq!(msg, "prompt rejected by moderation"),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn http_401_is_classified_as_auth() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("POST", "/jobs/createTask").with_status(401).create();

        let client = test_client(&server.url());
        let err = client.create_task(&test_request()).unwrap_err();
        assert!(err.is_auth(), "expected Auth, got: {err}");
    }

    #[test]
    fn envelope_code_401_is_classified_as_auth() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/jobs/createTask")
            .with_status(200)
            .with_body(r#"{"code": 401, "msg": "invalid api key"}"#)
            .create();

        let client = test_client(&server.url());
        let err = client.create_task(&test_request()).unwrap_err();

        match err {
            GenerationError::Auth(msg) => assert_eq!(msg, "invalid api key"),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn placeholder_credential_never_touches_the_network() {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", "/jobs/createTask").expect(0).create();

        let client =
            HttpGenerationClient::new(Credential::new("YOUR_API_KEY"), &test_config(&server.url()))
                .unwrap();
        let err = client.create_task(&test_request()).unwrap_err();

        assert!(err.is_auth());
        mock.assert();
    }

    #[test]
    fn task_status_parses_nested_result_urls_in_order() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/jobs/recordInfo")
            .match_query(mockito::Matcher::UrlEncoded("taskId".into(), "task-123".into()))
            .with_status(200)
            .with_body(
                r#"{"code": 200, "data": {"state": "success",
                    "resultJson": "{\"resultUrls\": [\"https://cdn.example/a.png\", \"https://cdn.example/b.png\"]}"}}"#,
            )
            .create();

        let client = test_client(&server.url());
        let snapshot = client.task_status(&TaskId::new("task-123")).unwrap();

        assert_eq!(snapshot.state, TaskState::Success);
        assert_eq!(
            snapshot.result_urls,
            vec!["https://cdn.example/a.png", "https://cdn.example/b.png"]
        );
    }

    #[test]
    fn malformed_result_json_degrades_to_empty_list() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/jobs/recordInfo")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code": 200, "data": {"state": "success", "resultJson": "not json"}}"#)
            .create();

        let client = test_client(&server.url());
        let snapshot = client.task_status(&TaskId::new("task-123")).unwrap();

        assert_eq!(snapshot.state, TaskState::Success);
        assert!(snapshot.result_urls.is_empty());
    }

    #[test]
    fn task_status_carries_failure_fields() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/jobs/recordInfo")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"code": 200, "data": {"state": "fail", "failCode": 500,
                    "failMsg": "content policy violation"}}"#,
            )
            .create();

        let client = test_client(&server.url());
        let snapshot = client.task_status(&TaskId::new("task-123")).unwrap();

        assert_eq!(snapshot.state, TaskState::Fail);
        assert_eq!(snapshot.fail_code.as_deref(), Some("500"));
        assert_eq!(snapshot.fail_reason.as_deref(), Some("content policy violation"));
    }

    #[test]
    fn non_terminal_states_are_in_progress() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/jobs/recordInfo")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code": 200, "data": {"state": "generating"}}"#)
            .create();

        let client = test_client(&server.url());
        let snapshot = client.task_status(&TaskId::new("task-123")).unwrap();

        assert_eq!(snapshot.state, TaskState::InProgress("generating".to_string()));
        assert!(snapshot.result_urls.is_empty());
    }

    #[test]
    fn undecodable_success_body_is_invalid_response() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/jobs/recordInfo")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create();

        let client = test_client(&server.url());
        let err = client.task_status(&TaskId::new("task-123")).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }

    #[test]
    fn endpoint_join_tolerates_trailing_slash() {
        let client = test_client("http://127.0.0.1:1/api/v1/");
        assert_eq!(client.endpoint(CREATE_TASK_PATH), "http://127.0.0.1:1/api/v1/jobs/createTask");
    }
}
