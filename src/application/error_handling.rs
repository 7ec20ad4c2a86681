// src/application/error_handling.rs
//
// Error handling for shell commands
//
// ARCHITECTURE:
// - Maps internal errors → user-facing responses
// - One consistent format for text and JSON output
// - Database internals are logged, not printed
// - A failed command never ends the session

use serde::Serialize;
use std::fmt;

use crate::error::AppError;

/// Error response printed by the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// No row with the given key
    NotFound,

    /// Bad command, name or value
    Validation,

    /// The store refused the change (keys, references)
    Conflict,

    /// Required rows are missing or a key range is exhausted
    Precondition,

    /// Database/persistence error
    Database,

    /// File system error
    FileSystem,

    /// Other/unknown error
    Internal,
}

impl ErrorType {
    pub fn label(self) -> &'static str {
        match self {
            ErrorType::NotFound => "not found",
            ErrorType::Validation => "invalid input",
            ErrorType::Conflict => "rejected",
            ErrorType::Precondition => "precondition not met",
            ErrorType::Database => "database",
            ErrorType::FileSystem => "file system",
            ErrorType::Internal => "internal",
        }
    }
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound { .. } => Self::new(ErrorType::NotFound, error.to_string(), None),

            AppError::UnknownEntity(_)
            | AppError::UnknownField { .. }
            | AppError::FieldTypeMismatch { .. }
            | AppError::ImmutableField { .. }
            | AppError::InvalidValue { .. }
            | AppError::InvalidCommand(_) => Self::validation(error.to_string()),

            AppError::ConstraintViolation(detail) => Self::new(
                ErrorType::Conflict,
                "The change violates a key or reference constraint".to_string(),
                Some(detail),
            ),

            AppError::PreconditionNotMet(detail) => {
                Self::new(ErrorType::Precondition, detail, None)
            }

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed".to_string(),
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::new(
                    ErrorType::Database,
                    "Database connection failed".to_string(),
                    None,
                )
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed".to_string(),
                    Some(io_error.to_string()),
                )
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(
                    ErrorType::Internal,
                    "Data serialization failed".to_string(),
                    None,
                )
            }

            AppError::Config(message) => Self::new(ErrorType::Internal, message, None),
        }
    }

    fn new(error_type: ErrorType, message: String, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message,
            details,
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error ({}): {}", self.error_type.label(), self.message)?;
        if let Some(details) = &self.details {
            write!(f, " [{}]", details)?;
        }
        Ok(())
    }
}
