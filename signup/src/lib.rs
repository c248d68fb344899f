//! Signup-form glue for the MailRelay API client.
//!
//! Reads account settings, checks the submitted email locally, and forwards
//! valid submissions to `mailrelay_core` as a new subscriber. Misconfiguration
//! and invalid input are hard errors; anything the API says comes back as a
//! `SignupOutcome`.

pub mod email;
pub mod error;
pub mod settings;
pub mod signup;
pub mod telemetry;

pub use email::SubscriberEmail;
pub use error::SignupError;
pub use settings::Settings;
pub use signup::{Signup, SignupForm, SignupOutcome, SUBSCRIBERS_PATH};
