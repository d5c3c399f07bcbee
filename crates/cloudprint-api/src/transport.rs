// Transport configuration for building reqwest::Client instances.
//
// The CloudPrint backend is fronted by two hosts: the org API under
// `cloudprint.makerbot.com/org` and the login service on
// `login.makerbot.com`. Both are reached through the same client.

use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Root of the org-scoped API. All authenticated endpoints hang off this.
pub const BASE_URL: &str = "https://cloudprint.makerbot.com/org";

/// Absolute login endpoint -- a different host than the org API.
pub const LOGIN_URL: &str = "https://login.makerbot.com/login";

/// The backend rejects unrecognized agents, so we present a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4758.82 Safari/537.36";

/// Request timeout applied to every call.
const TIMEOUT: Duration = Duration::from_millis(5000);

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: Url,
    pub login_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("invalid base URL constant"),
            login_url: Url::parse(LOGIN_URL).expect("invalid login URL constant"),
            timeout: TIMEOUT,
            user_agent: USER_AGENT.to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// The session cookie is NOT configured here -- it is owned by
    /// [`CloudClient`](crate::CloudClient) and attached per request, so
    /// the client itself stays stateless.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(Error::Transport)
    }
}
