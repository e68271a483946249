//! Error types for tableqb

use thiserror::Error;

/// Result type alias for tableqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for query builder operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// The driver reported a failure.
    ///
    /// Only the driver's message text is kept; structured codes are dropped.
    #[error("{0}")]
    Driver(String),

    /// A driver row could not be decoded into the table's row shape
    #[error("Decode error on table '{table}': {message}")]
    Decode { table: String, message: String },

    /// The driver returned rows where a write result was expected, or vice versa
    #[error("Unexpected driver outcome: expected {expected}, got {got}")]
    UnexpectedOutcome {
        expected: &'static str,
        got: &'static str,
    },

    /// A statement template could not be rendered
    #[error("Render error: {0}")]
    Render(String),
}

impl QbError {
    /// Create a driver error from anything that can be displayed
    pub fn driver(err: impl std::fmt::Display) -> Self {
        Self::Driver(err.to_string())
    }

    /// Create a decode error for a specific table
    pub fn decode(table: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Decode {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Check if this error was reported by the driver
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}
