//! Claim scoring input and output records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::ScoredClaimId;

use crate::error::FraudError;

/// Placeholder used when a claim or policy number is not supplied
pub const UNSPECIFIED_NUMBER: &str = "NA";

/// Raw scoring request as received from a caller
///
/// Every field is optional; [`ClaimScoreRequest::normalize`] applies the
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimScoreRequest {
    pub claim_number: Option<String>,
    pub policy_number: Option<String>,
    pub amount: Option<Decimal>,
    pub prior_claims: Option<i64>,
    pub channel: Option<String>,
    pub city: Option<String>,
}

impl ClaimScoreRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim_number = Some(number.into());
        self
    }

    pub fn policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = Some(number.into());
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn prior_claims(mut self, count: i64) -> Self {
        self.prior_claims = Some(count);
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Reads a request from loosely typed JSON.
    ///
    /// `amount` and `prior_claims` may be numbers or numeric strings; a
    /// fractional `prior_claims` is truncated. `null` or a missing key means
    /// "use the default".
    ///
    /// # Errors
    ///
    /// `FraudError::Validation` if the body is not an object or a field has
    /// the wrong shape.
    pub fn from_json(body: &Value) -> Result<Self, FraudError> {
        let fields = match body {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => return Err(FraudError::validation("Claim body must be a JSON object")),
        };

        let text = |key: &str| -> Result<Option<String>, FraudError> {
            match fields.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(FraudError::validation(format!(
                    "{key} must be a string, got {other}"
                ))),
            }
        };

        let amount = match fields.get("amount") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(parse_decimal("amount", &n.to_string())?),
            Some(Value::String(s)) => Some(parse_decimal("amount", s)?),
            Some(other) => {
                return Err(FraudError::validation(format!(
                    "amount must be numeric, got {other}"
                )))
            }
        };

        let prior_claims = match fields.get("prior_claims") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(count) => Some(count),
                None => n.as_f64().map(|f| f.trunc() as i64),
            },
            Some(Value::String(s)) => Some(s.trim().parse::<i64>().map_err(|_| {
                FraudError::validation(format!("prior_claims must be an integer, got {s:?}"))
            })?),
            Some(other) => {
                return Err(FraudError::validation(format!(
                    "prior_claims must be an integer, got {other}"
                )))
            }
        };

        Ok(Self {
            claim_number: text("claim_number")?,
            policy_number: text("policy_number")?,
            amount,
            prior_claims,
            channel: text("channel")?,
            city: text("city")?,
        })
    }

    /// Applies defaults and canonical casing.
    ///
    /// amount and prior_claims default to zero, channel and city to the
    /// empty string; channel and city are trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// `FraudError::Validation` for a negative amount or prior-claim count.
    pub fn normalize(self) -> Result<ClaimFacts, FraudError> {
        let amount = self.amount.unwrap_or(Decimal::ZERO);
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(FraudError::validation("amount must not be negative"));
        }

        let prior_claims = self.prior_claims.unwrap_or(0);
        let prior_claims = u32::try_from(prior_claims)
            .map_err(|_| FraudError::validation("prior_claims must be a non-negative integer"))?;

        Ok(ClaimFacts {
            claim_number: self
                .claim_number
                .unwrap_or_else(|| UNSPECIFIED_NUMBER.to_string()),
            policy_number: self
                .policy_number
                .unwrap_or_else(|| UNSPECIFIED_NUMBER.to_string()),
            amount,
            prior_claims,
            channel: canonical(self.channel),
            city: canonical(self.city),
        })
    }
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, FraudError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| FraudError::validation(format!("{field} must be numeric, got {raw:?}")))
}

fn canonical(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_lowercase()
}

/// A normalized claim, the only input rules ever see
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFacts {
    pub claim_number: String,
    pub policy_number: String,
    pub amount: Decimal,
    pub prior_claims: u32,
    /// Trimmed, lower-case submission channel
    pub channel: String,
    /// Trimmed, lower-case city
    pub city: String,
}

/// Binary fraud label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudLabel {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "SUSPICIOUS")]
    Suspicious,
}

impl FraudLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FraudLabel::Ok => "OK",
            FraudLabel::Suspicious => "SUSPICIOUS",
        }
    }
}

impl fmt::Display for FraudLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FraudLabel {
    type Err = FraudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(FraudLabel::Ok),
            "SUSPICIOUS" => Ok(FraudLabel::Suspicious),
            other => Err(FraudError::validation(format!("Unknown fraud label: {other}"))),
        }
    }
}

/// What a caller gets back from scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub claim_number: String,
    pub fraud_label: FraudLabel,
    pub fraud_score: Decimal,
    /// Reasons of the triggered rules, in rule-table order
    pub reasons: Vec<String>,
}

/// A persisted, scored claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredClaim {
    pub id: ScoredClaimId,
    pub claim_number: String,
    pub policy_number: String,
    pub amount: Decimal,
    pub channel: String,
    pub city: String,
    pub prior_claims: u32,
    pub fraud_score: Decimal,
    pub fraud_label: FraudLabel,
    pub created_at: DateTime<Utc>,
}

impl ScoredClaim {
    pub fn new(facts: ClaimFacts, fraud_score: Decimal, fraud_label: FraudLabel) -> Self {
        Self {
            id: ScoredClaimId::new_v7(),
            claim_number: facts.claim_number,
            policy_number: facts.policy_number,
            amount: facts.amount,
            channel: facts.channel,
            city: facts.city,
            prior_claims: facts.prior_claims,
            fraud_score,
            fraud_label,
            created_at: Utc::now(),
        }
    }
}
