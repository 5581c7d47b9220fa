//! Book-specific error types.

use crate::domain::foundation::{BookId, DomainError, ErrorCode, ValidationError};

/// Book-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Book does not exist or is not owned by the caller.
    NotFound(BookId),
    /// Malformed input.
    Validation { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl BookError {
    pub fn not_found(id: BookId) -> Self {
        BookError::NotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BookError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BookError::NotFound(_) => ErrorCode::BookNotFound,
            BookError::Validation { .. } => ErrorCode::ValidationFailed,
            BookError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            BookError::NotFound(id) => format!("Book not found or access denied: {}", id),
            BookError::Validation { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BookError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for BookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookError {}

impl From<DomainError> for BookError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::OutOfRange => BookError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => BookError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for BookError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field } => field.clone(),
            ValidationError::TooSmall { field, .. } => field.clone(),
        };
        BookError::Validation {
            field,
            message: err.to_string(),
        }
    }
}
