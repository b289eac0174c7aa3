//! Error types for the lending core

use serde::Serialize;
use thiserror::Error;

/// Numeric error codes exposed to callers alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchAccount = 4,
    NoSuchBook = 5,
    NoSuchRecord = 6,
    BookUnavailable = 7,
    Duplicate = 8,
    BookInUse = 9,
    EmptyCart = 10,
    BadValue = 11,
    BadCredentials = 12,
}

/// Coarse classification of failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Unavailable,
    StateError,
    Unauthorized,
    Storage,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No open borrow record {0} for this account")]
    RecordNotFound(i32),

    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Book {0} is already in the cart")]
    DuplicateEntry(i32),

    #[error("Book {0} is currently borrowed and cannot be deleted")]
    BookInUse(i32),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Quantity must be greater than zero (got {0})")]
    InvalidQuantity(i32),

    #[error("Book '{0}' has no copy available")]
    BookUnavailable(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) | AppError::RecordNotFound(_) => ErrorKind::NotFound,
            AppError::DuplicateUsername(_) | AppError::DuplicateEntry(_) | AppError::BookInUse(_) => {
                ErrorKind::Conflict
            }
            AppError::Validation(_) | AppError::InvalidQuantity(_) => ErrorKind::InvalidInput,
            AppError::BookUnavailable(_) => ErrorKind::Unavailable,
            AppError::EmptyCart => ErrorKind::StateError,
            AppError::InvalidCredentials | AppError::Authorization(_) => ErrorKind::Unauthorized,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::Storage,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(_) => ErrorCode::NoSuchBook,
            AppError::RecordNotFound(_) => ErrorCode::NoSuchRecord,
            AppError::DuplicateUsername(_) | AppError::DuplicateEntry(_) => ErrorCode::Duplicate,
            AppError::BookInUse(_) => ErrorCode::BookInUse,
            AppError::Validation(_) | AppError::InvalidQuantity(_) => ErrorCode::BadValue,
            AppError::BookUnavailable(_) => ErrorCode::BookUnavailable,
            AppError::EmptyCart => ErrorCode::EmptyCart,
            AppError::InvalidCredentials => ErrorCode::BadCredentials,
            AppError::Authorization(_) => ErrorCode::NotAuthorized,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }

    /// True when the underlying database error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(e) => e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Failure notice handed to the presentation layer
#[derive(Debug, Serialize)]
pub struct Notice {
    pub code: u32,
    pub kind: ErrorKind,
    pub error: String,
    pub message: String,
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        let message = match err {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let code = err.code();
        Notice {
            code: code as u32,
            kind: err.kind(),
            error: format!("{:?}", code),
            message,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
