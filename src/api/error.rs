//! Failure taxonomy of board operations.

/// Message shown whenever the session is missing or rejected.
pub const NOT_LOGGED_IN: &str = "not logged in, run `joinboard login`";

/// Errors returned by the typed API and the flows built on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The server's `message` field, or a generic description.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from backend: {0}")]
    Parse(String),

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// A task or contact id that does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// `"task"` or `"contact"`.
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Authentication or session check failed.
    #[error("{0}")]
    Unauthorized(String),

    /// Local state (the stored token) could not be read or written.
    #[error("local state error: {0}")]
    Storage(String),
}

impl ApiError {
    /// The uniform "not logged in" error.
    #[must_use]
    pub fn not_logged_in() -> Self {
        Self::Unauthorized(NOT_LOGGED_IN.to_string())
    }

    /// Task id unknown to the cache or the backend.
    #[must_use]
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound { kind: "task", id: id.to_string() }
    }

    /// Contact id unknown to the backend.
    #[must_use]
    pub fn contact_not_found(id: &str) -> Self {
        Self::NotFound { kind: "contact", id: id.to_string() }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Transport(err.to_string())
    }
}
