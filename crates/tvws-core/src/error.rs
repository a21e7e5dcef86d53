use thiserror::Error;

use tvws_api::Error as ApiError;

/// Error taxonomy for the query/ingestion workflow.
///
/// Validation failures are raised at the boundary of the operation that
/// detects them and never reach the network; remote rejections carry the
/// service's `{detail}` message verbatim. Per-row batch failures are not
/// errors; they land in the [`BatchReport`](crate::BatchReport) ledger.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad credentials or an expired/invalid session. Recoverable by
    /// re-authenticating.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Malformed selection or remote rejection of a query. Recoverable
    /// by adjusting inputs and retrying.
    #[error("Query failed: {message}")]
    Query { message: String },

    /// Single-record upload rejected by the service.
    #[error("Upload failed: {message}")]
    Upload { message: String },

    /// Input rejected before any network call was made.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The service could not be reached at all.
    #[error("Service unreachable: {message}")]
    Connection { message: String },
}

impl CoreError {
    fn from_api(err: ApiError, wrap: impl FnOnce(String) -> Self) -> Self {
        match err {
            ApiError::Authentication { message } => Self::Auth { message },
            ApiError::Transport(e) => Self::Connection {
                message: e.to_string(),
            },
            ApiError::Api { message, .. } => wrap(message),
            other => wrap(other.to_string()),
        }
    }

    /// Map an API error raised during a query (or the catalog fetches
    /// that feed one).
    pub(crate) fn query_from(err: ApiError) -> Self {
        Self::from_api(err, |message| Self::Query { message })
    }

    /// Map an API error raised during a measurement upload.
    pub(crate) fn upload_from(err: ApiError) -> Self {
        Self::from_api(err, |message| Self::Upload { message })
    }

    /// Map an API error raised during authentication.
    pub(crate) fn auth_from(err: ApiError) -> Self {
        Self::from_api(err, |message| Self::Auth { message })
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
