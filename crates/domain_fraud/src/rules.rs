//! Fraud rules and the ordered rule table
//!
//! A rule is an immutable `(id, predicate, weight, reason)` value. Rules are
//! collected into a [`RuleTable`] which is handed to the engine at
//! construction, so alternate rule sets never require touching the
//! evaluation loop.
//!
//! # Default table
//!
//! | id                  | triggers when                      | weight |
//! |---------------------|------------------------------------|--------|
//! | `high_amount`       | amount > 300,000                   | 50     |
//! | `frequent_claimant` | prior claims >= 3                  | 25     |
//! | `online_channel`    | channel is `online`                | 5      |
//! | `unknown_city`      | city is `unknown`, `na` or empty   | 10     |

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::claim::ClaimFacts;
use crate::error::RuleError;

/// Claims strictly above this amount trigger `high_amount`
pub const HIGH_AMOUNT_LIMIT: Decimal = dec!(300000);

/// Claimants with at least this many prior claims trigger `frequent_claimant`
pub const FREQUENT_CLAIMANT_MIN: u32 = 3;

/// City values treated as missing
pub const UNKNOWN_CITIES: [&str; 3] = ["unknown", "na", ""];

/// Predicate over a normalized claim
pub type Predicate = Arc<dyn Fn(&ClaimFacts) -> Result<bool, RuleError> + Send + Sync>;

/// Result of evaluating one rule against one claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Triggered,
    NotTriggered,
    /// The predicate errored or panicked; counts as not triggered
    Failed(String),
}

impl RuleOutcome {
    pub fn is_triggered(&self) -> bool {
        matches!(self, RuleOutcome::Triggered)
    }
}

/// A single weighted fraud rule
#[derive(Clone)]
pub struct FraudRule {
    id: String,
    weight: Decimal,
    reason: String,
    predicate: Predicate,
}

impl FraudRule {
    /// Creates a rule from a fallible predicate
    ///
    /// # Errors
    ///
    /// `RuleError::InvalidWeight` if `weight` is negative.
    pub fn new<F>(
        id: impl Into<String>,
        weight: Decimal,
        reason: impl Into<String>,
        predicate: F,
    ) -> Result<Self, RuleError>
    where
        F: Fn(&ClaimFacts) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        let id = id.into();
        if weight.is_sign_negative() && !weight.is_zero() {
            return Err(RuleError::InvalidWeight { rule: id, weight });
        }
        Ok(Self {
            id,
            weight,
            reason: reason.into(),
            predicate: Arc::new(predicate),
        })
    }

    /// Creates a rule from a predicate that cannot fail
    pub fn infallible<F>(
        id: impl Into<String>,
        weight: Decimal,
        reason: impl Into<String>,
        predicate: F,
    ) -> Result<Self, RuleError>
    where
        F: Fn(&ClaimFacts) -> bool + Send + Sync + 'static,
    {
        Self::new(id, weight, reason, move |claim| Ok(predicate(claim)))
    }

    // Weight must be a non-negative literal
    fn fixed<F>(id: &str, weight: Decimal, reason: &str, predicate: F) -> Self
    where
        F: Fn(&ClaimFacts) -> bool + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            weight,
            reason: reason.to_string(),
            predicate: Arc::new(move |claim: &ClaimFacts| -> Result<bool, RuleError> {
                Ok(predicate(claim))
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Evaluates the predicate; errors and panics become `Failed`
    pub fn evaluate(&self, claim: &ClaimFacts) -> RuleOutcome {
        match catch_unwind(AssertUnwindSafe(|| (self.predicate)(claim))) {
            Ok(Ok(true)) => RuleOutcome::Triggered,
            Ok(Ok(false)) => RuleOutcome::NotTriggered,
            Ok(Err(e)) => {
                warn!(rule = %self.id, error = %e, "Fraud rule failed, treating as not triggered");
                RuleOutcome::Failed(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(rule = %self.id, panic = %message, "Fraud rule panicked, treating as not triggered");
                RuleOutcome::Failed(message)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "predicate panicked".to_string()
    }
}

impl fmt::Debug for FraudRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FraudRule")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of rules with unique ids
///
/// Order only affects the order of reasons; scoring is additive.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<FraudRule>,
}

impl RuleTable {
    /// An empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// The four standard claim-fraud rules
    pub fn standard() -> Self {
        Self {
            rules: vec![
                FraudRule::fixed("high_amount", dec!(50), "High claim amount > 300k", |c| {
                    c.amount > HIGH_AMOUNT_LIMIT
                }),
                FraudRule::fixed("frequent_claimant", dec!(25), "Three or more prior claims", |c| {
                    c.prior_claims >= FREQUENT_CLAIMANT_MIN
                }),
                FraudRule::fixed("online_channel", dec!(5), "Online submission", |c| {
                    c.channel == "online"
                }),
                FraudRule::fixed("unknown_city", dec!(10), "Missing/unknown city", |c| {
                    UNKNOWN_CITIES.contains(&c.city.as_str())
                }),
            ],
        }
    }

    /// Appends a rule
    ///
    /// # Errors
    ///
    /// `RuleError::DuplicateRule` if a rule with the same id is present.
    pub fn push(&mut self, rule: FraudRule) -> Result<(), RuleError> {
        if self.get(rule.id()).is_some() {
            return Err(RuleError::DuplicateRule(rule.id));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Builder form of [`RuleTable::push`]
    pub fn with_rule(mut self, rule: FraudRule) -> Result<Self, RuleError> {
        self.push(rule)?;
        Ok(self)
    }

    /// Replaces the rule with the same id, keeping its position
    pub fn replace(&mut self, rule: FraudRule) -> Result<FraudRule, RuleError> {
        let slot = self
            .rules
            .iter_mut()
            .find(|r| r.id == rule.id)
            .ok_or_else(|| RuleError::UnknownRule(rule.id.clone()))?;
        Ok(std::mem::replace(slot, rule))
    }

    /// Removes a rule by id
    pub fn remove(&mut self, id: &str) -> Option<FraudRule> {
        let index = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&FraudRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FraudRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sum of all weights, the highest score this table can produce;
    /// saturates at `Decimal::MAX`
    pub fn total_weight(&self) -> Decimal {
        self.rules
            .iter()
            .fold(Decimal::ZERO, |total, r| total.saturating_add(r.weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> ClaimFacts {
        ClaimFacts {
            claim_number: "C-1".to_string(),
            policy_number: "P-1".to_string(),
            amount: dec!(1000),
            prior_claims: 0,
            channel: "agent".to_string(),
            city: "chennai".to_string(),
        }
    }

    #[test]
    fn test_standard_table() {
        let table = RuleTable::standard();
        let ids: Vec<&str> = table.iter().map(|r| r.id()).collect();

        assert_eq!(ids, vec!["high_amount", "frequent_claimant", "online_channel", "unknown_city"]);
        assert_eq!(table.total_weight(), dec!(90));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = FraudRule::infallible("bad", dec!(-1), "Bad", |_| true);
        assert!(matches!(result, Err(RuleError::InvalidWeight { .. })));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut table = RuleTable::standard();
        let rule = FraudRule::infallible("online_channel", dec!(1), "Dup", |_| true).unwrap();
        assert_eq!(
            table.push(rule),
            Err(RuleError::DuplicateRule("online_channel".to_string()))
        );
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut table = RuleTable::standard();
        let rule = FraudRule::infallible("frequent_claimant", dec!(30), "Two or more", |c| {
            c.prior_claims >= 2
        })
        .unwrap();

        let old = table.replace(rule).unwrap();
        assert_eq!(old.weight(), dec!(25));
        assert_eq!(table.iter().nth(1).unwrap().weight(), dec!(30));

        let missing = FraudRule::infallible("nope", dec!(1), "Nope", |_| true).unwrap();
        assert!(matches!(table.replace(missing), Err(RuleError::UnknownRule(_))));
    }

    #[test]
    fn test_remove() {
        let mut table = RuleTable::standard();
        assert!(table.remove("online_channel").is_some());
        assert!(table.remove("online_channel").is_none());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_evaluate_error_is_failed() {
        let rule = FraudRule::new("broken", dec!(10), "Broken", |_| {
            Err(RuleError::Evaluation("no data".to_string()))
        })
        .unwrap();

        let outcome = rule.evaluate(&facts());
        assert!(matches!(outcome, RuleOutcome::Failed(_)));
        assert!(!outcome.is_triggered());
    }

    #[test]
    fn test_evaluate_panic_is_failed() {
        let rule = FraudRule::infallible("panics", dec!(10), "Panics", |_| {
            panic!("index out of range")
        })
        .unwrap();

        match rule.evaluate(&facts()) {
            RuleOutcome::Failed(message) => assert!(message.contains("index out of range")),
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_city_values() {
        let table = RuleTable::standard();
        let rule = table.get("unknown_city").unwrap();

        for city in ["unknown", "na", ""] {
            let mut claim = facts();
            claim.city = city.to_string();
            assert!(rule.evaluate(&claim).is_triggered(), "city {city:?}");
        }
        assert!(!rule.evaluate(&facts()).is_triggered());
    }
}
