// ── Core error types ──
//
// User-facing errors from innkeep-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<innkeep_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// No usable session: never logged in, or the token was rejected.
    #[error("Not logged in -- run `innkeep login` first")]
    LoginRequired,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// The backend answered `success: false`. Displays the server's text
    /// unchanged.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The text shown in an error notification: server messages pass
    /// through verbatim, everything else uses the display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired | Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<innkeep_api::Error> for CoreError {
    fn from(err: innkeep_api::Error) -> Self {
        use innkeep_api::Error as Api;

        match err {
            Api::Unauthorized { .. } | Api::MissingToken => CoreError::LoginRequired,
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "Resource".into(),
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        status: e.status().map_or(0, |s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            Api::Rejected { message, .. } => CoreError::Rejected { message },
            Api::Http { status: 404, message } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message,
            },
            Api::Http { status, message } => CoreError::Api { status, message },
            Api::MissingData { path } => {
                CoreError::Internal(format!("response from {path} carried no data"))
            }
            Api::Validation { field, reason } => CoreError::ValidationFailed {
                message: format!("{field}: {reason}"),
            },
            Api::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket connection failed: {reason}"),
            },
            Api::WebSocketClosed { code, reason } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket closed (code {code}): {reason}"),
            },
            Api::Protocol(msg) => CoreError::Internal(format!("realtime protocol: {msg}")),
            Api::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            Api::Io(e) => CoreError::ValidationFailed {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_keeps_server_text() {
        let err = CoreError::from(innkeep_api::Error::Rejected {
            message: "Guest already checked in".into(),
            details: vec![],
        });
        assert_eq!(err.user_message(), "Guest already checked in");
        assert_eq!(err.to_string(), "Guest already checked in");
    }

    #[test]
    fn unauthorized_means_login_required() {
        let err = CoreError::from(innkeep_api::Error::Unauthorized {
            message: "jwt expired".into(),
        });
        assert!(err.is_login_required());
    }

    #[test]
    fn http_404_maps_to_not_found() {
        let err = CoreError::from(innkeep_api::Error::Http {
            status: 404,
            message: "Not Found".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
