//! Fraud scoring errors

use core_kernel::PortError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by the scoring service
#[derive(Debug, Error)]
pub enum FraudError {
    /// Malformed claim input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisting the scored claim failed
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl FraudError {
    pub fn validation(message: impl Into<String>) -> Self {
        FraudError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FraudError::Validation(_))
    }
}

/// Errors raised while building or evaluating rules
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// A predicate could not be evaluated
    #[error("Rule evaluation failed: {0}")]
    Evaluation(String),

    #[error("Duplicate rule id: {0}")]
    DuplicateRule(String),

    #[error("Rule {rule} has negative weight {weight}")]
    InvalidWeight { rule: String, weight: Decimal },

    #[error("Unknown rule id: {0}")]
    UnknownRule(String),
}
