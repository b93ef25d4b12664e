//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use mistly_config::ConfigError;
use mistly_core::CoreError;

/// Process exit codes. Argument errors exit with 2 from clap itself.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFIG: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Mist cloud at {url}: {reason}")]
    #[diagnostic(
        code(mistly::connection_failed),
        help("Check network access to the API host, or pick the right region with --cloud.")
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(mistly::auth_failed),
        help("Verify the master API token (MIST_TOKEN or `token`) and the region.")
    )]
    AuthFailed { message: String },

    #[error("No {field} configured")]
    #[diagnostic(
        code(mistly::no_credentials),
        help("Set the {env} environment variable or `{field}` in the deployment document.")
    )]
    NoCredentials { field: String, env: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{kind} '{key}' not found on the Mist cloud")]
    #[diagnostic(code(mistly::not_found), help("Run: mistly site create"))]
    NotFound { kind: String, key: String },

    #[error("AP {mac} does not belong to a site")]
    #[diagnostic(code(mistly::not_assigned), help("Run: mistly ap provision {mac}"))]
    NotAssigned { mac: String },

    #[error("Could not {action} {target}")]
    #[diagnostic(
        code(mistly::rejected),
        help("The Mist cloud refused the request; run with -v for the response body.")
    )]
    Rejected { action: String, target: String },

    #[error("API error: {message}")]
    #[diagnostic(code(mistly::api_error))]
    ApiError { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Missing configuration field: {field}")]
    #[diagnostic(code(mistly::missing_field), help("Add `{field}` to the deployment document."))]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mistly::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(mistly::config),
        help("Pass the document with --config or MISTLY_CONFIG.")
    )]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::NotAssigned { .. } => exit_code::NOT_FOUND,
            Self::MissingField { .. } | Self::Validation { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::Rejected { .. } | Self::ApiError { .. } => exit_code::GENERAL,
        }
    }

    pub fn rejected(action: &str, target: impl Into<String>) -> Self {
        Self::Rejected {
            action: action.into(),
            target: target.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingField { field } => CliError::MissingField { field },
            CoreError::Validation { field, reason } => CliError::Validation { field, reason },
            CoreError::NoCredentials { field, env } => CliError::NoCredentials { field, env },
            CoreError::NotFound { kind, key } => CliError::NotFound { kind, key },
            CoreError::NotAssigned { mac } => CliError::NotAssigned { mac },
            CoreError::ListingRefused { kind, key } => CliError::ApiError {
                message: format!("could not tell whether {kind} '{key}' exists: listing refused"),
            },
            CoreError::HandleRetired { kind, key } => CliError::ApiError {
                message: format!("{kind} '{key}' was already deleted"),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Api { message } => CliError::ApiError { message },
        }
    }
}

impl From<mistly_api::Error> for CliError {
    fn from(err: mistly_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
