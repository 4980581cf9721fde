//! Form submission: the submit-control state machine and the HTTP client.
//!
//! The endpoint answers a successful insert with the literal body `null`.
//! Any other body is a failure even when the transport succeeded.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Response body that marks a successful submission.
pub const SUCCESS_SENTINEL: &str = "null";

pub const SUBMIT_LABEL: &str = "Submit";
pub const BUSY_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("HTTP error! Status: {status}, Message: {body}")]
    Http { status: u16, body: String },
    #[error("Form submission returned an error status")]
    Rejected { body: String },
    #[error("Network or request error: {0}")]
    Transport(String),
}

/// Decide the outcome of a completed request from its status and body text.
pub fn interpret_response(status: u16, body: &str) -> Result<(), SubmitError> {
    if !(200..300).contains(&status) {
        return Err(SubmitError::Http {
            status,
            body: body.to_string(),
        });
    }
    if body == SUCCESS_SENTINEL {
        Ok(())
    } else {
        Err(SubmitError::Rejected {
            body: body.to_string(),
        })
    }
}

/// Identifies one submission from `begin` to its result.
pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// The submit button: disabled with a busy label while a request is in
/// flight, restored in every terminal case.
#[derive(Debug)]
pub struct SubmitControl {
    phase: SubmitPhase,
    disabled: bool,
    label: String,
    original_label: Option<String>,
    in_flight: Option<SubmissionId>,
    last_outcome: Option<SubmitPhase>,
}

impl SubmitControl {
    pub fn new() -> Self {
        Self {
            phase: SubmitPhase::Idle,
            disabled: false,
            label: SUBMIT_LABEL.to_string(),
            original_label: None,
            in_flight: None,
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Outcome of the most recent finished submission.
    pub fn last_outcome(&self) -> Option<SubmitPhase> {
        self.last_outcome
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    /// Enter `Submitting` for submission `id`. Returns `false` (and changes
    /// nothing) when a submission is already in flight.
    pub fn begin(&mut self, id: SubmissionId) -> bool {
        if self.disabled || self.phase == SubmitPhase::Submitting {
            return false;
        }
        self.in_flight = Some(id);
        self.phase = SubmitPhase::Submitting;
        self.disabled = true;
        self.original_label = Some(std::mem::replace(&mut self.label, BUSY_LABEL.to_string()));
        true
    }

    /// Pass through `Succeeded`/`Failed`, restore the control and settle back
    /// into `Idle`. Returns the terminal phase, or `None` without touching
    /// anything when `id` is not the submission in flight.
    pub fn finish(&mut self, id: SubmissionId, outcome: &Result<(), SubmitError>) -> Option<SubmitPhase> {
        if self.in_flight != Some(id) {
            return None;
        }
        self.in_flight = None;
        let terminal = match outcome {
            Ok(()) => SubmitPhase::Succeeded,
            Err(_) => SubmitPhase::Failed,
        };
        self.phase = terminal;
        self.disabled = false;
        if let Some(label) = self.original_label.take() {
            self.label = label;
        }
        self.last_outcome = Some(terminal);
        self.phase = SubmitPhase::Idle;
        Some(terminal)
    }
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Posts encoded form bodies to the scouting endpoint.
#[derive(Debug, Clone)]
pub struct FormClient {
    http: reqwest::Client,
}

impl FormClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub async fn submit(&self, action_url: &str, body: String) -> Result<(), SubmitError> {
        debug!(url = action_url, bytes = body.len(), "submitting form");
        let response = self
            .http
            .post(action_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(format!("failed to read response body: {e}")))?;

        let outcome = interpret_response(status, &text);
        if let Err(ref e) = outcome {
            warn!(status, error = %e, "form submission failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Router};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone)]
    struct Endpoint {
        status: StatusCode,
        body: &'static str,
        seen: Arc<Mutex<Vec<(Option<String>, Option<String>, String)>>>,
    }

    async fn insert_data(
        State(endpoint): State<Endpoint>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, &'static str) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        endpoint
            .seen
            .lock()
            .unwrap()
            .push((header("content-type"), header("accept"), body));
        (endpoint.status, endpoint.body)
    }

    async fn spawn_endpoint(endpoint: Endpoint) -> anyhow::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = Router::new()
            .route("/api/insert_data", post(insert_data))
            .with_state(endpoint);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{addr}/api/insert_data"))
    }

    fn endpoint(status: StatusCode, body: &'static str) -> Endpoint {
        Endpoint {
            status,
            body,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[test]
    fn test_interpret_response() {
        assert_eq!(interpret_response(200, "null"), Ok(()));
        assert_eq!(interpret_response(204, "null"), Ok(()));
        assert_eq!(
            interpret_response(200, "ok"),
            Err(SubmitError::Rejected { body: "ok".into() })
        );
        assert_eq!(
            interpret_response(500, "boom"),
            Err(SubmitError::Http {
                status: 500,
                body: "boom".into()
            })
        );
        // A 5xx carrying the sentinel is still a failure.
        assert!(interpret_response(503, "null").is_err());
    }

    #[test]
    fn test_error_messages() {
        let http = SubmitError::Http {
            status: 500,
            body: "database locked".into(),
        };
        assert_eq!(
            http.to_string(),
            "HTTP error! Status: 500, Message: database locked"
        );
        let rejected = SubmitError::Rejected { body: "ok".into() };
        assert_eq!(rejected.to_string(), "Form submission returned an error status");
    }

    #[test]
    fn test_control_blocks_duplicate_submit() {
        let mut control = SubmitControl::new();
        assert!(control.begin(1));
        assert!(control.is_disabled());
        assert_eq!(control.label(), BUSY_LABEL);
        assert_eq!(control.phase(), SubmitPhase::Submitting);
        assert!(!control.begin(2));
        assert_eq!(control.in_flight(), Some(1));
    }

    #[test]
    fn test_control_ignores_result_of_other_submission() {
        let mut control = SubmitControl::new();
        control.begin(7);
        assert_eq!(control.finish(3, &Ok(())), None);
        assert!(control.is_disabled());
        assert_eq!(control.label(), BUSY_LABEL);
        assert_eq!(control.finish(7, &Ok(())), Some(SubmitPhase::Succeeded));
        assert_eq!(control.in_flight(), None);
    }

    #[test]
    fn test_control_restores_in_every_terminal_case() {
        let outcomes = [
            Ok(()),
            Err(SubmitError::Rejected { body: "ok".into() }),
            Err(SubmitError::Transport("refused".into())),
        ];
        for outcome in outcomes {
            let mut control = SubmitControl::new();
            control.begin(1);
            let terminal = control.finish(1, &outcome).unwrap();
            assert_eq!(terminal == SubmitPhase::Succeeded, outcome.is_ok());
            assert_eq!(control.phase(), SubmitPhase::Idle);
            assert!(!control.is_disabled());
            assert_eq!(control.label(), SUBMIT_LABEL);
            assert_eq!(control.last_outcome(), Some(terminal));
        }
    }

    #[tokio::test]
    async fn test_submit_success_sentinel() -> anyhow::Result<()> {
        let ep = endpoint(StatusCode::OK, "null");
        let seen = ep.seen.clone();
        let url = spawn_endpoint(ep).await?;

        let client = FormClient::new(Duration::from_secs(5))?;
        let result = client
            .submit(&url, "args%5Bname%5D=Ada&args%5Bteam_number%5D=4682".into())
            .await;
        assert_eq!(result, Ok(()));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (content_type, accept, body) = &seen[0];
        assert_eq!(
            content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(accept.as_deref(), Some("application/json"));
        assert_eq!(body, "args%5Bname%5D=Ada&args%5Bteam_number%5D=4682");
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_non_sentinel_body_fails() -> anyhow::Result<()> {
        let url = spawn_endpoint(endpoint(StatusCode::OK, "ok")).await?;
        let client = FormClient::new(Duration::from_secs(5))?;
        let result = client.submit(&url, String::new()).await;
        assert_eq!(result, Err(SubmitError::Rejected { body: "ok".into() }));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_server_error_carries_status() -> anyhow::Result<()> {
        let url = spawn_endpoint(endpoint(StatusCode::INTERNAL_SERVER_ERROR, "boom")).await?;
        let client = FormClient::new(Duration::from_secs(5))?;
        let err = client.submit(&url, String::new()).await.unwrap_err();
        assert!(err.to_string().contains("Status: 500"));
        assert!(err.to_string().contains("boom"));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_unreachable_is_transport_error() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let client = FormClient::new(Duration::from_secs(2))?;
        let err = client
            .submit(&format!("http://{addr}/api/insert_data"), String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
        Ok(())
    }
}
