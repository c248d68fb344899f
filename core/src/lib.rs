//! Synchronous API client core for the MailRelay mailing-list service.
//!
//! # Overview
//! Builds an `HttpRequest`, hands it to a pluggable `Transport`, and reduces
//! the transport's raw output to one verdict: success, or a `RequestError`
//! whose text is the diagnostic shown to the caller.
//!
//! # Design
//! - `MailRelayClient` holds its config, a transport and per-call state that
//!   is reset at the start of every call.
//! - `response::evaluate` is pure, so every failure mode (hard transport
//!   error, validation error in the body, slow exchange, unclassified) can be
//!   exercised with canned `RawResponse` values.
//! - `UreqTransport` is the default; tests and embedders can plug in their
//!   own `Transport`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use client::{MailRelayClient, Outcome, AUTH_HEADER, DEFAULT_TIMEOUT_SECS};
pub use config::ClientConfig;
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, RawResponse, TransportInfo};
pub use response::{evaluate, Evaluation, LastResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{NewSubscriber, SubscriberStatus};
