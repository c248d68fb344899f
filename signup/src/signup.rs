//! Form submission handling: validate locally, then subscribe through the
//! API client.

use std::collections::BTreeMap;

use mailrelay_core::{
    ClientConfig, MailRelayClient, NewSubscriber, Transport, UreqTransport, DEFAULT_TIMEOUT_SECS,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::email::SubscriberEmail;
use crate::error::SignupError;
use crate::settings::Settings;

/// Path of the create-subscriber method.
pub const SUBSCRIBERS_PATH: &str = "subscribers";

/// Fields submitted by the signup form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub merge: BTreeMap<String, Value>,
}

/// What the form shows after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub success: bool,
    pub error: Option<String>,
}

/// Signs up form submissions; one API client per submission.
#[derive(Debug)]
pub struct Signup<T = UreqTransport> {
    settings: Settings,
    transport: T,
    timeout_secs: u64,
}

impl Signup<UreqTransport> {
    pub fn new(settings: Settings) -> Self {
        Self::with_transport(settings, UreqTransport)
    }
}

impl<T: Transport> Signup<T> {
    pub fn with_transport(settings: Settings, transport: T) -> Self {
        Self {
            settings,
            transport,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn client_config(&self) -> Result<ClientConfig, SignupError> {
        let account = self
            .settings
            .account_name
            .as_deref()
            .ok_or(SignupError::MissingAccountName)?;
        let api_key = self
            .settings
            .api_key
            .clone()
            .ok_or(SignupError::MissingApiKey)?;

        let config = match &self.settings.base_url {
            Some(base_url) => ClientConfig::with_base_url(base_url, api_key),
            None => ClientConfig::new(account, api_key),
        };
        Ok(config.verify_tls(self.settings.verify_tls))
    }

    /// Subscribe the submitted address.
    ///
    /// Configuration and email problems are returned as `Err` before any
    /// request is made. API failures are not errors here: they come back as
    /// an unsuccessful `SignupOutcome` carrying the client's error text.
    #[tracing::instrument(name = "signup", skip(self, form))]
    pub fn subscribe(&self, form: &SignupForm) -> Result<SignupOutcome, SignupError> {
        let config = self.client_config()?;
        let email = SubscriberEmail::parse(&form.email)?;

        let subscriber = NewSubscriber::new(email.as_ref())
            .with_merge_fields(form.merge.clone().into_iter().collect());

        let mut client = MailRelayClient::with_transport(config, &self.transport);
        client.post_with_timeout(SUBSCRIBERS_PATH, &subscriber, self.timeout_secs);

        if client.success() {
            info!("subscriber created");
        } else {
            warn!(error = client.last_error(), "subscription rejected");
        }

        Ok(SignupOutcome {
            success: client.success(),
            error: client.last_error().map(str::to_string),
        })
    }
}
