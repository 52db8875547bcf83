//! Claim Fraud Scoring Domain
//!
//! Scores insurance claims for fraud risk with an ordered table of weighted
//! rules. Each rule is a predicate over the normalized claim, a fixed
//! non-negative weight, and a human-readable reason.
//!
//! # Scoring
//!
//! ```text
//! normalize -> for each rule (in order): triggered? score += weight, note reason
//!           -> clamp to [0, 100] -> label SUSPICIOUS if score >= threshold
//! ```
//!
//! A rule whose predicate fails is treated as not triggered, so one bad rule
//! cannot block scoring.

pub mod claim;
pub mod rules;
pub mod engine;
pub mod ports;
pub mod services;
pub mod error;

pub use claim::{ClaimScoreRequest, ClaimFacts, FraudLabel, ScoreOutcome, ScoredClaim};
pub use rules::{FraudRule, RuleOutcome, RuleTable};
pub use engine::{FraudScoringEngine, RiskAssessment, ScoringConfig};
pub use ports::ClaimStorePort;
pub use services::ClaimScoringService;
pub use error::{FraudError, RuleError};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryClaimStore;
