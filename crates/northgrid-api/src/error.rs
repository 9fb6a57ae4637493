use thiserror::Error;

/// A single `(field, message)` pair pulled out of a structured error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Top-level error type for the `northgrid-api` crate.
///
/// `northgrid-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// Bearer token cannot be sent as a header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response. `field_errors` is empty when the body was unstructured.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        field_errors: Vec<FieldError>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
