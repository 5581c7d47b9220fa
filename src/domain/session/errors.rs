//! Session lifecycle error types.

use crate::domain::foundation::{BookId, DomainError, ErrorCode};

use crate::domain::book::BookError;

/// Session lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Book does not exist or is not owned by the caller.
    BookNotFound(BookId),
    /// No open session to stop.
    NoOpenSession,
    /// Operation requested against the wrong lifecycle state.
    InvalidState(String),
    /// Malformed input.
    Validation { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn book_not_found(id: BookId) -> Self {
        SessionError::BookNotFound(id)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        SessionError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::BookNotFound(_) => ErrorCode::BookNotFound,
            SessionError::NoOpenSession => ErrorCode::SessionNotFound,
            SessionError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            SessionError::Validation { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SessionError::BookNotFound(id) => {
                format!("Book not found or access denied: {}", id)
            }
            SessionError::NoOpenSession => "No active reading session found".to_string(),
            SessionError::InvalidState(msg) => msg.clone(),
            SessionError::Validation { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => SessionError::InvalidState(err.message),
            ErrorCode::ValidationFailed | ErrorCode::OutOfRange => SessionError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<BookError> for SessionError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(id) => SessionError::BookNotFound(id),
            BookError::Validation { field, message } => SessionError::Validation { field, message },
            BookError::Infrastructure(msg) => SessionError::Infrastructure(msg),
        }
    }
}
