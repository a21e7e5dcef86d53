//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tvws_core::CoreError;

/// Exit codes for scripting.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const PARTIAL: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the spectrum service: {message}")]
    #[diagnostic(
        code(tvws::connection_failed),
        help(
            "Check the service URL and your network connection.\n\
             Try: tvws states list -v"
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(tvws::auth_failed),
        help("Check your email and password, then run: tvws login")
    )]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(code(tvws::not_logged_in), help("Run: tvws login"))]
    NotLoggedIn,

    // ── Service rejections ───────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(tvws::rejected))]
    Rejected { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tvws::validation))]
    Validation { field: String, reason: String },

    // ── Batch ────────────────────────────────────────────────────────

    #[error("{failed} of {total} batch rows failed")]
    #[diagnostic(
        code(tvws::batch_partial),
        help("The remaining rows were uploaded; see the ledger above for row numbers.")
    )]
    BatchPartial { failed: usize, total: usize },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tvws::profile_not_found),
        help("Create one with: tvws config init")
    )]
    ProfileNotFound { name: String },

    #[error("No service URL configured")]
    #[diagnostic(
        code(tvws::no_config),
        help(
            "Pass --service <URL>, set TVWS_SERVICE, or create a profile with: tvws config init\n\
             Expected config at: {path}"
        )
    )]
    NoService { path: String },

    #[error(transparent)]
    #[diagnostic(code(tvws::config))]
    Config(#[from] tvws_config::ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotLoggedIn => exit_code::AUTH,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoService { .. } => {
                exit_code::USAGE
            }
            Self::BatchPartial { .. } => exit_code::PARTIAL,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth { message } => Self::AuthFailed { message },
            CoreError::Query { message } | CoreError::Upload { message } => {
                Self::Rejected { message }
            }
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::Connection { message } => Self::ConnectionFailed { message },
        }
    }
}

// ── ApiError → CliError mapping (client construction, raw calls) ─────

impl From<tvws_api::Error> for CliError {
    fn from(err: tvws_api::Error) -> Self {
        match err {
            tvws_api::Error::Authentication { message } => Self::AuthFailed { message },
            tvws_api::Error::Transport(e) => Self::ConnectionFailed {
                message: e.to_string(),
            },
            tvws_api::Error::Tls(reason) => Self::ConnectionFailed { message: reason },
            tvws_api::Error::InvalidUrl(e) => Self::Validation {
                field: "service".into(),
                reason: e.to_string(),
            },
            other => Self::Rejected {
                message: other.to_string(),
            },
        }
    }
}
