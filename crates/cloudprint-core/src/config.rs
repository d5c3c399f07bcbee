// ── Client configuration ──
//
// Describes how to reach the CloudPrint backend and which credentials to
// present. Mirrors the loose options object of the upstream API: username,
// password, and token are all optional, and validity is checked when the
// credentials are resolved, not field by field.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use cloudprint_api::{Credentials, TransportConfig};

use crate::error::CoreError;

/// How often the registry resyncs in live mode.
pub const DEFAULT_RESYNC_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a CloudPrint client session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Account username, paired with `password`.
    pub username: Option<String>,
    /// Account password, paired with `username`.
    pub password: Option<SecretString>,
    /// Pre-issued session token, used when the username/password pair is
    /// incomplete.
    pub token: Option<SecretString>,
    /// Org API base URL.
    pub base_url: Url,
    /// Absolute login endpoint.
    pub login_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Resync cadence for the printer registry.
    pub resync_interval: Duration,
    /// Whether the registry keeps itself current on a timer.
    pub live: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            username: None,
            password: None,
            token: None,
            base_url: transport.base_url,
            login_url: transport.login_url,
            timeout: transport.timeout,
            resync_interval: DEFAULT_RESYNC_INTERVAL,
            live: true,
        }
    }
}

impl ClientConfig {
    /// Config for username/password login.
    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(SecretString::from(password.into())),
            ..Self::default()
        }
    }

    /// Config for a pre-issued session token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            ..Self::default()
        }
    }

    /// Resolve the configured fields into concrete [`Credentials`].
    ///
    /// A complete username/password pair wins over a token when both are
    /// supplied. Neither form present is a configuration error.
    pub fn credentials(&self) -> Result<Credentials, CoreError> {
        match (&self.username, &self.password, &self.token) {
            (Some(username), Some(password), _) => Ok(Credentials::Password {
                username: username.clone(),
                password: password.clone(),
            }),
            (_, _, Some(token)) => Ok(Credentials::Token(token.clone())),
            _ => Err(CoreError::Config {
                message: "either username/password or a session token must be provided".into(),
            }),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.base_url.clone(),
            login_url: self.login_url.clone(),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}
