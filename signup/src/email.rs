use std::fmt;

use validator::validate_email;

use crate::error::SignupError;

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 64;

/// An email address that passed the signup form's checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(value: &str) -> Result<Self, SignupError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SignupError::InvalidEmail("email is required".into()));
        }
        let len = value.chars().count();
        if len < MIN_LEN {
            return Err(SignupError::InvalidEmail(format!(
                "email must be at least {MIN_LEN} characters"
            )));
        }
        if len > MAX_LEN {
            return Err(SignupError::InvalidEmail(format!(
                "email may not be greater than {MAX_LEN} characters"
            )));
        }
        if !validate_email(value) {
            return Err(SignupError::InvalidEmail(
                "email must be a valid email address".into(),
            ));
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
