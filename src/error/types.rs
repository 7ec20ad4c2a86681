// src/error/types.rs
use rusqlite::ErrorCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown entity kind: {0}")]
    UnknownEntity(String),

    #[error("Unknown field '{field}' on {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Field '{field}' on {entity} is not {expected}")]
    FieldTypeMismatch {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field '{field}' on {entity} cannot be changed")]
    ImmutableField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AppError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Constraint failures reported by SQLite become `ConstraintViolation`,
/// everything else stays a plain database error.
impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            let detail = match &err {
                rusqlite::Error::SqliteFailure(_, Some(message)) => message.clone(),
                other => other.to_string(),
            };
            return AppError::ConstraintViolation(detail);
        }
        AppError::Database(err)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
