//! Registration store error types.

use std::fmt;

/// Errors that can occur while talking to a registration store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The registration does not exist (or no longer exists).
    #[error("Registration not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The store refused the operation.
    #[error("Request rejected{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Rejected {
        /// Transport status code, when there is one.
        status: Option<u16>,
        /// Description returned by the store.
        message: String,
    },

    /// The operation did not complete in time.
    #[error("Timed out: {message}")]
    Timeout {
        /// Description of what timed out.
        message: String,
    },

    /// Failed to reach the store.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// The store answered with something that could not be understood.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of the decoding problem.
        message: String,
    },

    /// An internal store error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a new `Rejected` error.
    #[must_use]
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidResponse` error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Rejected { .. } => ErrorCategory::Rejected,
            Self::Timeout { .. } | Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::InvalidResponse { .. } => ErrorCategory::Protocol,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Registration not found.
    NotFound,
    /// Refused by the store.
    Rejected,
    /// Network, connection or timeout problem.
    Infrastructure,
    /// Malformed response.
    Protocol,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Rejected => write!(f, "rejected"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Protocol => write!(f, "protocol"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("reg-1");
        assert_eq!(err.to_string(), "Registration not found: reg-1");

        let err = StorageError::rejected(Some(409), "event is full");
        assert_eq!(err.to_string(), "Request rejected (HTTP 409): event is full");

        let err = StorageError::rejected(None, "duplicate");
        assert_eq!(err.to_string(), "Request rejected: duplicate");
    }

    #[test]
    fn test_error_predicates_and_category() {
        assert!(StorageError::not_found("x").is_not_found());
        assert!(StorageError::timeout("slow").is_timeout());
        assert_eq!(
            StorageError::connection_error("refused").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            StorageError::invalid_response("bad json").category().to_string(),
            "protocol"
        );
    }
}
