//! Fraud Scoring Engine
//!
//! Reduces a normalized claim to a score, a label and the reasons of the
//! rules that fired. The engine holds no mutable state; the same claim
//! always produces the same assessment.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::CoreError;

use crate::claim::{ClaimFacts, FraudLabel};
use crate::rules::RuleTable;

/// Default score at or above which a claim is labelled suspicious
pub const DEFAULT_THRESHOLD: Decimal = dec!(60);

/// Default upper bound of the score
pub const DEFAULT_MAX_SCORE: Decimal = dec!(100);

/// Scoring thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub threshold: Decimal,
    pub max_score: Decimal,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_score: DEFAULT_MAX_SCORE,
        }
    }
}

impl ScoringConfig {
    pub fn with_threshold(mut self, threshold: Decimal) -> Self {
        self.threshold = threshold;
        self
    }

    /// Checks `0 <= threshold <= max_score` and `max_score > 0`
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_score <= Decimal::ZERO {
            return Err(CoreError::configuration(format!(
                "max_score must be positive, got {}",
                self.max_score
            )));
        }
        if self.threshold < Decimal::ZERO || self.threshold > self.max_score {
            return Err(CoreError::configuration(format!(
                "threshold must be within [0, {}], got {}",
                self.max_score, self.threshold
            )));
        }
        Ok(())
    }
}

/// Result of assessing one claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: Decimal,
    pub label: FraudLabel,
    /// Reasons of the triggered rules, in table order
    pub reasons: Vec<String>,
    /// Ids of the triggered rules, in table order
    pub triggered: Vec<String>,
}

impl RiskAssessment {
    pub fn is_suspicious(&self) -> bool {
        self.label == FraudLabel::Suspicious
    }
}

/// Weighted rule evaluator
#[derive(Debug, Clone)]
pub struct FraudScoringEngine {
    rules: Arc<RuleTable>,
    config: ScoringConfig,
}

impl FraudScoringEngine {
    /// Builds an engine over `rules`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` when `config` fails
    /// [`ScoringConfig::validate`]
    pub fn new(rules: RuleTable, config: ScoringConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            rules: Arc::new(rules),
            config,
        })
    }

    /// The standard rule table with default thresholds
    pub fn standard() -> Self {
        Self {
            rules: Arc::new(RuleTable::standard()),
            config: ScoringConfig::default(),
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores a claim.
    ///
    /// Weights of triggered rules are summed in table order, saturating at
    /// `Decimal::MAX`, and the total is clamped to `[0, max_score]`. Failed
    /// rules contribute nothing.
    pub fn assess(&self, claim: &ClaimFacts) -> RiskAssessment {
        let mut score = Decimal::ZERO;
        let mut reasons = Vec::new();
        let mut triggered = Vec::new();

        for rule in self.rules.iter() {
            if rule.evaluate(claim).is_triggered() {
                score = score.saturating_add(rule.weight());
                reasons.push(rule.reason().to_string());
                triggered.push(rule.id().to_string());
            }
        }

        let score = score.clamp(Decimal::ZERO, self.config.max_score);
        let label = self.label_for(score);

        debug!(
            claim_number = %claim.claim_number,
            score = %score,
            label = %label,
            rules = ?triggered,
            "Claim assessed"
        );

        RiskAssessment {
            score,
            label,
            reasons,
            triggered,
        }
    }

    /// Label for an already computed score
    pub fn label_for(&self, score: Decimal) -> FraudLabel {
        if score >= self.config.threshold {
            FraudLabel::Suspicious
        } else {
            FraudLabel::Ok
        }
    }
}

impl Default for FraudScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}
