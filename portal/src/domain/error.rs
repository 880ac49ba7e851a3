//! Transport-agnostic failure taxonomy for backend calls.
//!
//! The HTTP adapter decodes every response in one place and produces an
//! [`ApiError`]; callers match on it instead of probing optional fields of a
//! raw error payload.

/// Coarse classification used by callers deciding what to show the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// No response was received (DNS, connect, timeout, reset).
    Network,
    /// The backend answered with a 4xx status.
    Client,
    /// The backend answered with a 5xx status (or another non-success code).
    Server,
    /// A success response body could not be interpreted.
    Decode,
    /// The request was rejected locally before being sent.
    InvalidRequest,
}

/// Failure of a single backend operation.
///
/// ## Invariants
/// - `Status::status` is never a 2xx code.
/// - `Status::message` holds the backend-supplied text verbatim, when any.
///
/// # Examples
/// ```
/// use portal::domain::{ApiError, ApiErrorKind};
///
/// let err = ApiError::status(401, Some("Token expired".to_owned()));
/// assert!(err.is_unauthorized());
/// assert_eq!(err.kind(), ApiErrorKind::Client);
/// assert_eq!(err.user_message("Login failed"), "Token expired");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network failure: {message}")]
    Network {
        /// Transport error description.
        message: String,
    },
    /// The backend returned a non-success status.
    #[error("request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-supplied message, when the body carried one.
        message: Option<String>,
    },
    /// A success body was not valid for the expected shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder error description.
        message: String,
    },
    /// The request could not be built (bad path parameter, unreadable file).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },
}

impl ApiError {
    /// Convenience constructor for [`ApiError::Network`].
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ApiError::Status`].
    #[must_use]
    pub fn status(status: u16, message: Option<String>) -> Self {
        Self::Status { status, message }
    }

    /// Convenience constructor for [`ApiError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ApiError::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Classify the failure.
    #[must_use]
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Network { .. } => ApiErrorKind::Network,
            Self::Status { status, .. } if (400..500).contains(status) => ApiErrorKind::Client,
            Self::Status { .. } => ApiErrorKind::Server,
            Self::Decode { .. } => ApiErrorKind::Decode,
            Self::InvalidRequest { .. } => ApiErrorKind::InvalidRequest,
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied message, when present.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the backend rejected the presented credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Text suitable for a notification: the backend's message, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(fallback)
            .to_owned()
    }
}
