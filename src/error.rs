//! Custom error types for Stockbook
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every variant folds into one of the
//! caller-facing [`ErrorKind`]s, which the `api` boundary turns into a status
//! code and response envelope.

use thiserror::Error;

/// Reason code carried by the financial gate refusal
pub const FINANCIAL_TRACKING_DISABLED: &str = "financial_tracking_disabled";

/// The main error type for Stockbook operations
#[derive(Error, Debug)]
pub enum StockbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors (missing id or dangling reference)
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Uniqueness violations
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Operation refused by a feature gate
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No authenticated principal
    #[error("Unauthorized")]
    Unauthorized,

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Arithmetic on stored amounts left the representable range
    #[error("Overflow: {0}")]
    Overflow(String),
}

/// Caller-facing error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Forbidden,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    /// HTTP-style status code for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation | ErrorKind::Conflict => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}

impl StockbookError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// The financial gate is closed
    pub fn financial_tracking_disabled() -> Self {
        Self::Forbidden(FINANCIAL_TRACKING_DISABLED.to_string())
    }

    /// Map this error onto the caller-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Duplicate { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Export(_)
            | Self::Storage(_)
            | Self::Overflow(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show a caller. `None` for internal failures, whose
    /// causes are only logged.
    pub fn public_message(&self) -> Option<String> {
        match self {
            Self::Validation(msg) => Some(msg.clone()),
            Self::Duplicate { entity_type, .. } => Some(format!("{} already exists", entity_type)),
            Self::NotFound { entity_type, .. } => Some(format!("{} not found", entity_type)),
            Self::Forbidden(reason) if reason == FINANCIAL_TRACKING_DISABLED => {
                Some("Financial tracking is disabled".to_string())
            }
            Self::Forbidden(reason) => Some(format!("Forbidden: {}", reason)),
            Self::Unauthorized => Some("Unauthorized".to_string()),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was raised by the financial gate
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for StockbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StockbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Stockbook operations
pub type StockbookResult<T> = Result<T, StockbookError>;
