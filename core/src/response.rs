//! Turns raw transport output into a verdict.
//!
//! # Design
//! `evaluate` is a pure function of the `RawResponse` and the timeout the
//! caller asked for. It runs the classification steps in a fixed order:
//! hard transport error, then header/body split and JSON decoding, then the
//! status fallback chain, then the success classifiers. The first classifier
//! that matches decides the verdict.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::RequestError;
use crate::http::{RawResponse, TransportInfo};

/// Stand-in status when neither the transport nor the body reports one.
/// Only ever compared inside `determine_success`.
const STATUS_INDETERMINATE: u16 = 418;

/// Everything captured from the most recent exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastResponse {
    /// Transport metadata; `None` until a call has run.
    pub headers: Option<TransportInfo>,
    /// Response headers parsed from the header block.
    pub http_headers: Option<BTreeMap<String, String>>,
    /// Response body; `None` when the transport produced no payload.
    pub body: Option<Vec<u8>>,
}

/// Result of interpreting one exchange.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub response: LastResponse,
    pub body: Option<Map<String, Value>>,
    pub verdict: Result<(), RequestError>,
}

/// Interpret `raw`; `timeout_secs == 0` disables the elapsed-time check.
pub fn evaluate(raw: RawResponse, timeout_secs: u64) -> Evaluation {
    let RawResponse { info, raw, error } = raw;

    let Some(payload) = raw else {
        let message = error.unwrap_or_else(|| "transport returned no response".to_string());
        return Evaluation {
            response: LastResponse {
                headers: Some(info),
                http_headers: None,
                body: None,
            },
            body: None,
            verdict: Err(RequestError::Transport(message)),
        };
    };

    let (block, body) = split_response(&payload, info.header_size);
    let http_headers = parse_headers(&String::from_utf8_lossy(block));
    let decoded = decode_body(body);
    let verdict = determine_success(&info, decoded.as_ref(), timeout_secs);

    Evaluation {
        response: LastResponse {
            headers: Some(info),
            http_headers: Some(http_headers),
            body: Some(body.to_vec()),
        },
        body: decoded,
        verdict,
    }
}

/// Slice the header block off the front of the payload. A header size past
/// the end of the payload takes everything as headers.
pub fn split_response(payload: &[u8], header_size: usize) -> (&[u8], &[u8]) {
    payload.split_at(header_size.min(payload.len()))
}

/// Parse a raw header block into name/value pairs.
///
/// Status lines are dropped, including those of interim responses such as
/// `100 Continue`. Lines without a `:` are skipped. A repeated header keeps
/// its last value.
pub fn parse_headers(block: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for line in block.split("\r\n") {
        if is_status_line(line) {
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                headers.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => debug!(line, "skipping malformed header line"),
        }
    }

    headers
}

fn is_status_line(line: &str) -> bool {
    let prefix: String = line.chars().take(7).collect();
    prefix.contains("HTTP/1") || prefix.contains("HTTP/2")
}

/// Decode a JSON object body. Empty bodies, invalid JSON and non-object
/// JSON all decode to `None`.
pub fn decode_body(body: &[u8]) -> Option<Map<String, Value>> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            debug!("response body is JSON but not an object");
            None
        }
        Err(e) => {
            debug!(error = %e, "response body is not valid JSON");
            None
        }
    }
}

/// Transport status, else the body's `status` field, else the sentinel.
pub(crate) fn find_http_status(info: &TransportInfo, body: Option<&Map<String, Value>>) -> u16 {
    if let Some(status) = info.status {
        return status;
    }

    body.and_then(|map| map.get("status"))
        .and_then(status_from_value)
        .unwrap_or(STATUS_INDETERMINATE)
}

fn status_from_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn determine_success(
    info: &TransportInfo,
    body: Option<&Map<String, Value>>,
    timeout_secs: u64,
) -> Result<(), RequestError> {
    let status = find_http_status(info, body);

    if (200..=299).contains(&status) {
        return Ok(());
    }

    if let Some(message) = body.and_then(first_email_error) {
        return Err(RequestError::Validation(message));
    }

    if timeout_secs > 0 && info.total_time >= timeout_secs as f64 {
        return Err(RequestError::Timeout {
            elapsed: info.total_time,
            timeout: timeout_secs,
        });
    }

    Err(RequestError::Unknown)
}

fn first_email_error(body: &Map<String, Value>) -> Option<String> {
    let first = body.get("errors")?.get("email")?.as_array()?.first()?;
    Some(match first {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
