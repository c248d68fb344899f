//! Account settings, read from the environment.

use std::env;

use secrecy::Secret;

use crate::error::SignupError;

pub const ACCOUNT_NAME_VAR: &str = "MAILRELAY_ACCOUNT_NAME";
pub const API_KEY_VAR: &str = "MAILRELAY_API_KEY";
pub const VERIFY_TLS_VAR: &str = "MAILRELAY_VERIFY_TLS";
pub const BASE_URL_VAR: &str = "MAILRELAY_BASE_URL";

/// Both credentials may be absent here; `Signup::subscribe` refuses to run
/// until they are set.
#[derive(Debug, Clone)]
pub struct Settings {
    pub account_name: Option<String>,
    pub api_key: Option<Secret<String>>,
    pub verify_tls: bool,
    /// Overrides the endpoint derived from the account name.
    pub base_url: Option<String>,
}

impl Settings {
    pub fn new(account_name: &str, api_key: &str) -> Self {
        Self {
            account_name: Some(account_name.to_string()),
            api_key: Some(Secret::new(api_key.to_string())),
            verify_tls: true,
            base_url: None,
        }
    }

    pub fn from_env() -> Result<Self, SignupError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SignupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let verify_tls = match read(VERIFY_TLS_VAR) {
            None => true,
            Some(value) => parse_bool(&value).ok_or(SignupError::InvalidSetting {
                name: VERIFY_TLS_VAR,
                value,
            })?,
        };

        Ok(Self {
            account_name: read(ACCOUNT_NAME_VAR),
            api_key: read(API_KEY_VAR).map(Secret::new),
            verify_tls,
            base_url: read(BASE_URL_VAR),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_all_keys() {
        let settings = Settings::from_lookup(lookup(&[
            (ACCOUNT_NAME_VAR, "acme"),
            (API_KEY_VAR, "k"),
            (VERIFY_TLS_VAR, "false"),
            (BASE_URL_VAR, "http://127.0.0.1:3000/api/v1"),
        ]))
        .unwrap();
        assert_eq!(settings.account_name.as_deref(), Some("acme"));
        assert_eq!(settings.api_key.unwrap().expose_secret(), "k");
        assert!(!settings.verify_tls);
        assert_eq!(settings.base_url.as_deref(), Some("http://127.0.0.1:3000/api/v1"));
    }

    #[test]
    fn blank_values_are_unset() {
        let settings =
            Settings::from_lookup(lookup(&[(ACCOUNT_NAME_VAR, " "), (API_KEY_VAR, "")])).unwrap();
        assert!(settings.account_name.is_none());
        assert!(settings.api_key.is_none());
        assert!(settings.verify_tls);
    }

    #[test]
    fn bad_verify_flag_is_rejected() {
        let err = Settings::from_lookup(lookup(&[(VERIFY_TLS_VAR, "maybe")])).unwrap_err();
        assert!(matches!(
            err,
            SignupError::InvalidSetting {
                name: VERIFY_TLS_VAR,
                ..
            }
        ));
    }
}
