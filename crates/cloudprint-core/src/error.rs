// ── Core error types ──
//
// User-facing errors from cloudprint-core. The `From<cloudprint_api::Error>`
// impl translates transport-layer failures into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ────────────────────────────────────────────────
    /// Bad or missing credentials at construction.
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Registry ─────────────────────────────────────────────────────
    /// The registry was queried before any printer load completed.
    #[error("Printers have not been loaded yet")]
    PrintersNotLoaded,

    /// No printer with the given id in the registry.
    #[error("Printer not found: {id}")]
    PrinterNotFound { id: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for registry-lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PrinterNotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cloudprint_api::Error> for CoreError {
    fn from(err: cloudprint_api::Error) -> Self {
        match err {
            cloudprint_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            cloudprint_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            cloudprint_api::Error::Transport(ref e) => CoreError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            cloudprint_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            cloudprint_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
