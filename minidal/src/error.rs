//! Error types for minidal

use thiserror::Error;

/// The main error type for minidal operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error, passed through from the driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Builder input that cannot form a valid statement
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A result column whose backend type has no `Value` representation
    #[error("Cannot decode column '{column}' of type {type_name}")]
    Decode { column: String, type_name: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection answered with the other kind of outcome than requested
    #[error("Expected {expected} from statement execution")]
    UnexpectedOutcome { expected: &'static str },
}

/// Convenience Result type for minidal operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new column decode error
    pub fn decode(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            type_name: type_name.into(),
        }
    }

    /// Whether this error came from the backing store
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
