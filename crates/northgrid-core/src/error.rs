// ── Core error types ──
//
// User-facing errors from northgrid-core. The `From<northgrid_api::Error>`
// impl translates transport-layer errors into domain variants; the view
// only ever shows `display_message()`.

use northgrid_api::FieldError;
use thiserror::Error;

/// Shown when an error carries no usable text.
pub const GENERIC_ERROR: &str = "An error occurred.";

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Server responses ─────────────────────────────────────────────
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        field_errors: Vec<FieldError>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The single string a dialog shows for this error.
    ///
    /// Structured bodies contribute their field messages, one per line.
    /// Everything else falls back to the error's own text.
    pub fn display_message(&self) -> String {
        match self {
            Self::Rejected { field_errors, .. } if !field_errors.is_empty() => field_errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Rejected { message, .. } if message.trim().is_empty() => GENERIC_ERROR.to_owned(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<northgrid_api::Error> for CoreError {
    fn from(err: northgrid_api::Error) -> Self {
        match err {
            northgrid_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Rejected {
                        status: status.as_u16(),
                        message: e.to_string(),
                        field_errors: Vec::new(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            northgrid_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            northgrid_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            northgrid_api::Error::InvalidToken(msg) => CoreError::Config {
                message: format!("Invalid bearer token: {msg}"),
            },
            northgrid_api::Error::Api {
                status,
                message,
                field_errors,
            } => CoreError::Rejected {
                status,
                message,
                field_errors,
            },
            northgrid_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_join_with_newlines() {
        let err = CoreError::Rejected {
            status: 400,
            message: "Bad Request".into(),
            field_errors: vec![
                FieldError::new("companyName", "Company name is required"),
                FieldError::new("contactName", "Contact name is invalid"),
            ],
        };
        assert_eq!(
            err.display_message(),
            "Company name is required\nContact name is invalid"
        );
    }

    #[test]
    fn unstructured_rejection_uses_message() {
        let err = CoreError::Rejected {
            status: 500,
            message: "database unavailable".into(),
            field_errors: Vec::new(),
        };
        assert_eq!(
            err.display_message(),
            "Request rejected (HTTP 500): database unavailable"
        );
    }

    #[test]
    fn blank_rejection_falls_back_to_generic() {
        let err = CoreError::Rejected {
            status: 502,
            message: "  ".into(),
            field_errors: Vec::new(),
        };
        assert_eq!(err.display_message(), GENERIC_ERROR);
    }

    #[test]
    fn connection_errors_use_display() {
        let err = CoreError::ConnectionFailed {
            url: "https://localhost:7244/customers".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.display_message(),
            "Cannot reach https://localhost:7244/customers: connection refused"
        );
    }

    #[test]
    fn api_errors_map_to_rejected() {
        let api = northgrid_api::Error::Api {
            status: 409,
            message: "Conflict".into(),
            field_errors: vec![FieldError::new("customerID", "already exists")],
        };
        let core = CoreError::from(api);
        assert!(matches!(core, CoreError::Rejected { status: 409, .. }));
        assert_eq!(core.display_message(), "already exists");
    }

    #[test]
    fn invalid_url_maps_to_config() {
        let api = northgrid_api::Error::InvalidUrl(url::ParseError::EmptyHost);
        assert!(matches!(CoreError::from(api), CoreError::Config { .. }));
    }
}
