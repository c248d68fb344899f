//! The seam between request building and the network.
//!
//! # Design
//! A `Transport` performs exactly one blocking exchange and never fails in
//! the Rust sense: every outcome, including "nothing came back", is encoded
//! in the returned `RawResponse`. The default `UreqTransport` reassembles the
//! status line and headers in front of the body and reports the block length,
//! so the interpreter sees the same shape whichever transport is plugged in.

use std::time::Instant;

use tracing::debug;

use crate::http::{HttpMethod, HttpRequest, RawResponse};

/// Executes one HTTP exchange.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> RawResponse;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> RawResponse {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// A fresh agent is built per call because timeout and TLS verification are
/// per-request settings. Redirects are not followed: a 3xx is handed to the
/// interpreter as-is, so one request is always one exchange.
///
/// The header block is rebuilt from the parsed response rather than copied
/// off the wire. Header names come back lowercased (`content-type`), the
/// status line is regenerated from the negotiated version, and `header_size`
/// is the length of that rebuilt block.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> RawResponse {
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(!request.verify_tls)
            .build();
        // Status codes, redirects included, are data for the interpreter.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(request.timeout)
            .tls_config(tls)
            .build()
            .new_agent();

        let started = Instant::now();
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = agent.get(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = agent.post(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(request.body.as_deref().unwrap_or_default().as_bytes())
            }
        };

        let mut response = match result {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "transport failed before a response arrived");
                return RawResponse::failed(e.to_string(), started.elapsed().as_secs_f64());
            }
        };

        let status = response.status();
        let mut block = format!(
            "{:?} {} {}\r\n",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );
        for (name, value) in response.headers() {
            block.push_str(name.as_str());
            block.push_str(": ");
            block.push_str(&String::from_utf8_lossy(value.as_bytes()));
            block.push_str("\r\n");
        }
        block.push_str("\r\n");

        let body = match response.body_mut().read_to_vec() {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "transport failed while reading the body");
                return RawResponse::failed(e.to_string(), started.elapsed().as_secs_f64());
            }
        };

        RawResponse::completed(status.as_u16(), &block, &body, started.elapsed().as_secs_f64())
    }
}
