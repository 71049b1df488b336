//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Cardstack.
///
/// Statement-registry errors are fatal at startup, DAO errors propagate
/// to the caller unrecovered, and transport errors are the only ones the
/// requestor retries.
#[derive(Error, Debug)]
pub enum CardstackError {
    // ============ Statement Registry Errors ============
    /// A statement resource could not be located or read.
    #[error("Error while reading sql resource {location}: {message}")]
    ResourceRead { location: String, message: String },

    /// A statement resource does not follow the statement-file grammar.
    #[error("Error parsing sql resource {resource} at line {line}: {message}")]
    Parse {
        resource: String,
        line: usize,
        message: String,
    },

    /// No statement with the requested name was loaded.
    #[error("No SQL statement with name {0} found in store")]
    StatementNotFound(String),

    // ============ Data Access Errors ============
    /// The caller violated an operation precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No entity with the requested identity exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A mutation did not affect exactly one row.
    #[error("Persistence error: {message}")]
    Persistence {
        kind: PersistenceFailure,
        message: String,
    },

    /// A returned row could not be mapped back into an entity.
    #[error("Row mapping error on column {column}: {message}")]
    RowMapping { column: String, message: String },

    /// Database driver error
    #[error("Database error: {0}")]
    Database(String),

    // ============ Infrastructure Errors ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Remote Service Errors ============
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote service answered with a non-success status.
    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardstackError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 412,
            Self::NotFound(_) => 404,
            Self::Timeout(_) => 503,
            Self::Transport(_) | Self::UnexpectedStatus { .. } | Self::Decode(_) => 502,
            Self::ResourceRead { .. }
            | Self::Parse { .. }
            | Self::StatementNotFound(_)
            | Self::Persistence { .. }
            | Self::RowMapping { .. }
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ResourceRead { .. } => "RESOURCE_READ_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::StatementNotFound(_) => "STATEMENT_NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::RowMapping { .. } => "ROW_MAPPING_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::NotFound(message.into())
    }

    /// Creates a persistence error for an unexpected row count.
    #[must_use]
    pub fn persistence<T: Into<String>>(message: T) -> Self {
        Self::Persistence {
            kind: PersistenceFailure::RowCount,
            message: message.into(),
        }
    }

    /// Creates a persistence error for a mutation that matched no row.
    #[must_use]
    pub fn persistence_not_found<T: Into<String>>(message: T) -> Self {
        Self::Persistence {
            kind: PersistenceFailure::NoRowMatched,
            message: message.into(),
        }
    }

    /// Creates a row mapping error for a column.
    #[must_use]
    pub fn row_mapping<C: Into<String>, M: Into<String>>(column: C, message: M) -> Self {
        Self::RowMapping {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if a remote call that failed with this error may be repeated.
    ///
    /// Covers transport failures, per-request timeouts, non-success statuses
    /// and undecodable bodies.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout(_) | Self::UnexpectedStatus { .. } | Self::Decode(_)
        )
    }

    /// Checks if the requested entity does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Persistence {
                    kind: PersistenceFailure::NoRowMatched,
                    ..
                }
        )
    }
}

/// Why a mutation was rejected as a persistence failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceFailure {
    /// The statement matched no row.
    NoRowMatched,
    /// The statement affected more rows than expected, or reported no id.
    RowCount,
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for CardstackError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::ColumnNotFound(column) => Self::RowMapping {
                column: column.clone(),
                message: "column not present in result set".to_string(),
            },
            sqlx::Error::ColumnDecode { index, source } => Self::RowMapping {
                column: index.clone(),
                message: source.to_string(),
            },
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CardstackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `CardstackError`.
    #[must_use]
    pub fn from_error(error: &CardstackError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&CardstackError> for ErrorResponse {
    fn from(error: &CardstackError) -> Self {
        Self::from_error(error)
    }
}
