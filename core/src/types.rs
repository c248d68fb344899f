//! Request payloads for the MailRelay API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Subscription state requested for a new subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberStatus {
    #[default]
    Active,
    Inactive,
}

/// Body of `POST subscribers`.
///
/// `merge_fields` is left out of the JSON entirely when there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubscriber {
    pub email: String,
    #[serde(default)]
    pub status: SubscriberStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_fields: Option<Map<String, Value>>,
}

impl NewSubscriber {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            status: SubscriberStatus::Active,
            merge_fields: None,
        }
    }

    /// Attach merge fields; an empty map is dropped.
    pub fn with_merge_fields(mut self, fields: Map<String, Value>) -> Self {
        self.merge_fields = if fields.is_empty() { None } else { Some(fields) };
        self
    }
}
