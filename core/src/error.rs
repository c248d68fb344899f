//! Error types for the MailRelay API client.
//!
//! # Design
//! `RequestError` is the failure half of a call's verdict, never something
//! `post` returns as `Err`. Its `Display` output is exactly the string the
//! client exposes through `last_error()`, so the message formats live here
//! and nowhere else.

/// Why a request was judged unsuccessful.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// The transport could not complete the exchange (DNS, refused
    /// connection, TLS). Carries the transport's text verbatim.
    #[error("{0}")]
    Transport(String),

    /// The API rejected the email address; carries the first message from
    /// `errors.email`.
    #[error("Error: {0}")]
    Validation(String),

    /// The exchange took at least as long as the requested timeout.
    #[error("Request timed out after {elapsed:.6} seconds (timeout {timeout} seconds).")]
    Timeout { elapsed: f64, timeout: u64 },

    /// No classifier matched; the captured response is the only clue.
    #[error("Unknown error, call last_response() to find out what happened.")]
    Unknown,

    /// The request payload could not be serialized to JSON.
    #[error("Failed to encode request payload: {0}")]
    Encode(String),
}
