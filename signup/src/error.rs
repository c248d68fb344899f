//! Errors raised before the API client is ever called.

/// A misconfigured deployment or a malformed submission.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("MailRelay account name is not configured.")]
    MissingAccountName,

    #[error("MailRelay API key is not configured.")]
    MissingApiKey,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid setting {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },
}
