use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Name of the session cookie issued by the login service.
pub const SESSION_COOKIE: &str = "makerbot.jwt";

/// Credentials for authenticating with the CloudPrint backend.
///
/// Exactly one form is used per session. `cloudprint-core` resolves its
/// optional-field configuration into this enum before connecting.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Username/password login. Exchanges the pair for a session token
    /// via the login service.
    Password {
        username: String,
        password: SecretString,
    },

    /// A pre-issued session token, installed directly as the session
    /// cookie without any outbound validation request.
    Token(SecretString),
}

/// An established session with the CloudPrint backend.
///
/// Created only by a successful login or by direct token injection, and
/// lives for the process lifetime of the client -- the backend exposes no
/// expiry or refresh mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque token presented as the `makerbot.jwt` cookie on every
    /// subsequent request.
    pub token: String,
    /// When the token was obtained (or injected).
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(token: String) -> Self {
        Self {
            token,
            issued_at: Utc::now(),
        }
    }

    /// The `Cookie` header value presenting this session.
    pub fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE}={};", self.token)
    }
}
