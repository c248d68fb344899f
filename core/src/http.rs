//! HTTP transport types for the pluggable-transport pattern.
//!
//! # Design
//! These types describe HTTP requests and raw transport output as plain data.
//! The client builds `HttpRequest` values and hands them to a `Transport`;
//! the transport answers with a `RawResponse` shaped the way a curl-style
//! transport reports it: metadata, the header block and body glued together,
//! or an error string when no response arrived at all. Interpretation of that
//! output lives in `response`, so it can be exercised without a network.

use std::time::Duration;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `MailRelayClient::build_request`. `timeout` is `None` when the
/// caller disabled the deadline.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
    pub verify_tls: bool,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Metadata reported by the transport for one exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportInfo {
    /// Numeric HTTP status, if the transport saw one.
    pub status: Option<u16>,
    /// Wall-clock seconds spent on the exchange.
    pub total_time: f64,
    /// Byte length of the header block at the front of the raw payload.
    pub header_size: usize,
}

/// Raw output of one transport call.
///
/// `raw` is `None` exactly when the exchange could not complete; `error` then
/// carries the transport's own description of the failure.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub info: TransportInfo,
    pub raw: Option<Vec<u8>>,
    pub error: Option<String>,
}

impl RawResponse {
    /// A completed exchange: `header_block` must include the terminating
    /// blank line.
    pub fn completed(status: u16, header_block: &str, body: &[u8], total_time: f64) -> Self {
        let mut raw = Vec::with_capacity(header_block.len() + body.len());
        raw.extend_from_slice(header_block.as_bytes());
        raw.extend_from_slice(body);
        Self {
            info: TransportInfo {
                status: Some(status),
                total_time,
                header_size: header_block.len(),
            },
            raw: Some(raw),
            error: None,
        }
    }

    /// An exchange that never produced a response.
    pub fn failed(message: impl Into<String>, total_time: f64) -> Self {
        Self {
            info: TransportInfo {
                status: None,
                total_time,
                header_size: 0,
            },
            raw: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_records_header_size() {
        let block = "HTTP/1.1 201 Created\r\nContent-Length: 2\r\n\r\n";
        let raw = RawResponse::completed(201, block, b"{}", 0.1);
        assert_eq!(raw.info.status, Some(201));
        assert_eq!(raw.info.header_size, block.len());
        assert_eq!(raw.raw.as_deref().unwrap().len(), block.len() + 2);
        assert!(raw.error.is_none());
    }

    #[test]
    fn failed_has_no_payload() {
        let raw = RawResponse::failed("Connection refused", 0.0);
        assert!(raw.raw.is_none());
        assert_eq!(raw.error.as_deref(), Some("Connection refused"));
        assert_eq!(raw.info.status, None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Post,
            url: "http://localhost/subscribers".to_string(),
            headers: vec![("X-AUTH-TOKEN".to_string(), "secret".to_string())],
            body: None,
            timeout: None,
            verify_tls: true,
        };
        assert_eq!(req.header("x-auth-token"), Some("secret"));
        assert_eq!(req.header("accept"), None);
    }
}
