// CloudPrint HTTP client
//
// Wraps `reqwest::Client` with org-scoped URL construction, session cookie
// attachment, and status policing. Endpoint modules (auth, user, printers)
// are implemented as inherent methods via separate files to keep this
// module focused on transport mechanics.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::header;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Session;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the CloudPrint org API.
///
/// Holds the established [`Session`] (if any) and attaches its cookie to
/// every request. The session value is published atomically, so the login
/// write happens-before any request that reads it -- no further
/// synchronization is needed even when requests run on multiple threads.
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
    login_url: Url,
    session: ArcSwapOption<Session>,
}

impl CloudClient {
    /// Create a new client from a [`TransportConfig`].
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: transport.base_url.clone(),
            login_url: transport.login_url.clone(),
            session: ArcSwapOption::empty(),
        })
    }

    /// The org API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The absolute login endpoint.
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// The underlying HTTP client (for the login flow, which bypasses the
    /// org-scoped request helpers).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Session state ────────────────────────────────────────────────

    /// The current session, if one has been established.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.load_full()
    }

    /// Whether a session token is installed.
    pub fn has_session(&self) -> bool {
        self.session.load().is_some()
    }

    /// Publish a new session. All requests issued after this call carry
    /// the session cookie.
    pub(crate) fn store_session(&self, session: Session) {
        self.session.store(Some(Arc::new(session)));
    }

    /// The `Cookie` header value for the current session, if any.
    pub fn cookie_header(&self) -> Option<String> {
        self.session.load().as_ref().map(|s| s.cookie_header())
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an org API path: `{base}/{path}`.
    pub(crate) fn endpoint_url(&self, path: &str) -> Url {
        let full = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&full).expect("invalid endpoint URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with the session cookie and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let mut req = self.http.get(url);
        if let Some(cookie) = self.cookie_header() {
            req = req.header(header::COOKIE, cookie);
        }

        let resp = req.send().await.map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Check for a 200 and decode the body, keeping it for diagnostics on
    /// decode failure. There is no error envelope -- anything other than a
    /// plain 200 is surfaced as [`Error::Http`].
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status != reqwest::StatusCode::OK {
            let message = if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned()
            } else {
                body
            };
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
