//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use innkeep_config::ConfigError;
use innkeep_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(innkeep::connection_failed),
        help(
            "{reason}\n\
             Check --api-url / the profile's api_url, or try --insecure for a\n\
             self-signed certificate."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not logged in")]
    #[diagnostic(
        code(innkeep::login_required),
        help(
            "Run: innkeep login\n\
             Or pass a token with --token / INNKEEP_TOKEN."
        )
    )]
    LoginRequired,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(innkeep::auth_failed),
        help("Check the email and password, then run: innkeep login")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(innkeep::not_found),
        help("Run: innkeep {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    /// The backend refused the request; its message is shown as-is.
    #[error("{message}")]
    #[diagnostic(code(innkeep::rejected))]
    Rejected { message: String },

    #[error("Backend error (HTTP {status}): {message}")]
    #[diagnostic(code(innkeep::api_error))]
    Api { status: u16, message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(innkeep::forbidden),
        help("Your account's role does not allow this operation.")
    )]
    Forbidden { message: String },

    #[error("Conflict: {message}")]
    #[diagnostic(code(innkeep::conflict))]
    Conflict { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(innkeep::internal))]
    Internal(String),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(innkeep::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(innkeep::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: innkeep config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(innkeep::config),
        help("Inspect it with: innkeep config show")
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(innkeep::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(innkeep::timeout),
        help("Increase the timeout with --timeout or check the backend.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(innkeep::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(innkeep::json), help("Check the JSON value and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::LoginRequired | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Map an interactive prompt failure.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

// ── CoreError → CliError mapping ─────────────────────────────────────

/// `guests list` for "Guest", `dining list` for "Dining place", ...
fn list_command_for(entity_type: &str) -> String {
    let noun = match entity_type {
        "Guest" => "guests",
        "Activity" => "activities",
        "Dining place" => "dining",
        "Streaming service" => "streaming",
        "Property information" => "info",
        "Background image" => "backgrounds",
        "Device" => "devices",
        "Alert" => "alerts",
        "Property" => "properties",
        _ => return "--help".into(),
    };
    format!("{noun} list")
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url: if url.is_empty() { "(realtime)".into() } else { url },
                reason,
            },

            CoreError::LoginRequired => CliError::LoginRequired,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api {
                status: 403,
                message,
            } => CliError::Forbidden { message },

            CoreError::Api {
                status: 409,
                message,
            } => CliError::Conflict { message },

            CoreError::Api { status, message } => CliError::Api { status, message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_rejection_text_is_kept() {
        let err = CliError::from(CoreError::Rejected {
            message: "Guest already checked in".into(),
        });
        assert_eq!(err.to_string(), "Guest already checked in");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn exit_codes_follow_the_table() {
        assert_eq!(CliError::from(CoreError::LoginRequired).exit_code(), exit_code::AUTH);
        assert_eq!(
            CliError::from(CoreError::Timeout { timeout_secs: 30 }).exit_code(),
            exit_code::TIMEOUT
        );
        assert_eq!(
            CliError::from(CoreError::Api {
                status: 403,
                message: "nope".into()
            })
            .exit_code(),
            exit_code::PERMISSION
        );
        assert_eq!(
            CliError::validation("apps", "empty").exit_code(),
            exit_code::USAGE
        );
    }

    #[test]
    fn not_found_points_at_the_list_command() {
        let err = CliError::from(CoreError::NotFound {
            entity_type: "Dining place".into(),
            identifier: "9".into(),
        });
        match err {
            CliError::NotFound { list_command, .. } => assert_eq!(list_command, "dining list"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
