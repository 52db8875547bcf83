//! Errors raised by kernel types before any store is involved

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Input rejected by a domain rule
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An id string that is not a UUID or carries the wrong kind prefix
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A setting outside its allowed range
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True for errors caused by the caller's input rather than missing data
    pub fn is_client_input(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidIdentifier(_))
    }
}
