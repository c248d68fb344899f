//! Request builder/executor for the MailRelay API.
//!
//! # Design
//! `MailRelayClient` owns its `ClientConfig`, a `Transport` and the state of
//! the most recent call. Each call resets that state before any I/O, runs
//! exactly one exchange, and writes the new verdict back. Calls take
//! `&mut self`, so one instance can never have two calls in flight.
//!
//! The full outcome is also returned from every call. Reading `success()` and
//! `last_error()` afterwards is kept for callers that prefer it.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest};
use crate::response::{evaluate, LastResponse};
use crate::transport::{Transport, UreqTransport};

/// Timeout applied by `post`, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Header carrying the API key.
pub const AUTH_HEADER: &str = "X-AUTH-TOKEN";

/// Decoded body and verdict of one call.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub body: Option<Map<String, Value>>,
    pub verdict: Result<(), RequestError>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.verdict.is_ok()
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.verdict.as_ref().err()
    }
}

#[derive(Debug, Default)]
struct ClientState {
    last_error: Option<String>,
    request_successful: bool,
    last_response: LastResponse,
}

/// Synchronous client for the MailRelay API.
#[derive(Debug)]
pub struct MailRelayClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
    state: ClientState,
}

impl MailRelayClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport)
    }
}

impl<T: Transport> MailRelayClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            state: ClientState::default(),
        }
    }

    pub fn api_endpoint(&self) -> &str {
        self.config.base_url()
    }

    /// Whether the most recent call succeeded.
    pub fn success(&self) -> bool {
        self.state.request_successful
    }

    /// Error text of the most recent call, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    pub fn last_response(&self) -> &LastResponse {
        &self.state.last_response
    }

    /// POST `args` as JSON to `path` with the default timeout.
    pub fn post<A: Serialize + ?Sized>(&mut self, path: &str, args: &A) -> Outcome {
        self.post_with_timeout(path, args, DEFAULT_TIMEOUT_SECS)
    }

    /// POST `args` as JSON to `path`; `timeout_secs == 0` disables the
    /// deadline.
    pub fn post_with_timeout<A: Serialize + ?Sized>(
        &mut self,
        path: &str,
        args: &A,
        timeout_secs: u64,
    ) -> Outcome {
        self.make_request(HttpMethod::Post, path, Some(args), timeout_secs)
    }

    pub fn get(&mut self, path: &str, timeout_secs: u64) -> Outcome {
        self.make_request::<()>(HttpMethod::Get, path, None, timeout_secs)
    }

    /// Build the request a call to `path` would send, without sending it.
    pub fn build_request<A: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        args: Option<&A>,
        timeout_secs: u64,
    ) -> Result<HttpRequest, RequestError> {
        let body = match (method, args) {
            (HttpMethod::Post, Some(args)) => Some(
                serde_json::to_string(args).map_err(|e| RequestError::Encode(e.to_string()))?,
            ),
            (HttpMethod::Post, None) => Some("{}".to_string()),
            (HttpMethod::Get, _) => None,
        };

        Ok(HttpRequest {
            method,
            url: format!("{}/{}", self.config.base_url(), path),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    AUTH_HEADER.to_string(),
                    self.config.api_key.expose_secret().clone(),
                ),
            ],
            body,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            verify_tls: self.config.verify_tls,
        })
    }

    #[tracing::instrument(
        name = "mailrelay_request",
        skip(self, method, args),
        fields(method = method.as_str())
    )]
    fn make_request<A: Serialize + ?Sized>(
        &mut self,
        method: HttpMethod,
        path: &str,
        args: Option<&A>,
        timeout_secs: u64,
    ) -> Outcome {
        self.state = ClientState::default();

        let request = match self.build_request(method, path, args, timeout_secs) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "request not sent");
                self.state.last_error = Some(e.to_string());
                return Outcome {
                    body: None,
                    verdict: Err(e),
                };
            }
        };

        debug!(url = %request.url, "sending request");
        let raw = self.transport.execute(&request);
        let evaluation = evaluate(raw, timeout_secs);

        self.state.last_response = evaluation.response;
        match &evaluation.verdict {
            Ok(()) => {
                debug!("request succeeded");
                self.state.request_successful = true;
            }
            Err(e) => {
                warn!(error = %e, "request failed");
                self.state.last_error = Some(e.to_string());
            }
        }

        Outcome {
            body: evaluation.body,
            verdict: evaluation.verdict,
        }
    }
}
