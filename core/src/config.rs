//! Connection settings for one client instance.

use secrecy::Secret;

/// Endpoint template of the hosted MailRelay API; `{}` is the account name.
const ENDPOINT_TEMPLATE: &str = "https://{}.ipzmarketing.com/api/v1";

/// Immutable settings owned by a single `MailRelayClient`.
///
/// The account name is interpolated into the endpoint as given. An empty or
/// malformed name yields a malformed URL; that is the caller's problem and
/// surfaces as a transport error on the first call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: String,
    pub(crate) api_key: Secret<String>,
    pub(crate) verify_tls: bool,
}

impl ClientConfig {
    pub fn new(account_name: &str, api_key: Secret<String>) -> Self {
        Self {
            base_url: ENDPOINT_TEMPLATE.replace("{}", account_name),
            api_key,
            verify_tls: true,
        }
    }

    /// Target an arbitrary API root, e.g. a local mock server.
    pub fn with_base_url(base_url: &str, api_key: Secret<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            verify_tls: true,
        }
    }

    /// Toggle TLS peer verification (on by default).
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Secret<String> {
        Secret::new("s3cr3t".to_string())
    }

    #[test]
    fn account_is_interpolated_into_endpoint() {
        let config = ClientConfig::new("acme", key());
        assert_eq!(config.base_url(), "https://acme.ipzmarketing.com/api/v1");
        assert!(config.verify_tls);
    }

    #[test]
    fn empty_account_is_not_validated() {
        let config = ClientConfig::new("", key());
        assert_eq!(config.base_url(), "https://.ipzmarketing.com/api/v1");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:3000/api/v1/", key());
        assert_eq!(config.base_url(), "http://127.0.0.1:3000/api/v1");
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let config = ClientConfig::new("acme", key()).verify_tls(false);
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("verify_tls: false"));
    }
}
