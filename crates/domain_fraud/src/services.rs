//! Claim scoring service

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::claim::{ClaimScoreRequest, ScoreOutcome, ScoredClaim};
use crate::engine::FraudScoringEngine;
use crate::error::FraudError;
use crate::ports::ClaimStorePort;

/// Normalizes, scores and records claims
#[derive(Clone)]
pub struct ClaimScoringService {
    engine: FraudScoringEngine,
    store: Arc<dyn ClaimStorePort>,
}

impl ClaimScoringService {
    pub fn new(engine: FraudScoringEngine, store: Arc<dyn ClaimStorePort>) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &FraudScoringEngine {
        &self.engine
    }

    /// Scores a claim and persists the result
    ///
    /// # Errors
    ///
    /// * `FraudError::Validation` for negative amounts or prior-claim counts
    /// * `FraudError::Store` if the scored claim cannot be saved
    #[instrument(skip(self, request), fields(claim_number = ?request.claim_number))]
    pub async fn score_claim(&self, request: ClaimScoreRequest) -> Result<ScoreOutcome, FraudError> {
        let facts = request.normalize()?;
        let assessment = self.engine.assess(&facts);

        let record = ScoredClaim::new(facts, assessment.score, assessment.label);
        let saved = self.store.insert_claim(record).await?;

        if assessment.is_suspicious() {
            warn!(
                claim_number = %saved.claim_number,
                score = %saved.fraud_score,
                rules = ?assessment.triggered,
                "Suspicious claim"
            );
        } else {
            info!(claim_number = %saved.claim_number, score = %saved.fraud_score, "Claim scored");
        }

        Ok(ScoreOutcome {
            claim_number: saved.claim_number,
            fraud_label: saved.fraud_label,
            fraud_score: saved.fraud_score,
            reasons: assessment.reasons,
        })
    }

    /// Scores a loosely typed JSON claim body
    pub async fn score_json(&self, body: &Value) -> Result<ScoreOutcome, FraudError> {
        let request = ClaimScoreRequest::from_json(body)?;
        self.score_claim(request).await
    }

    /// Scores without persisting
    pub fn preview(&self, request: ClaimScoreRequest) -> Result<ScoreOutcome, FraudError> {
        let facts = request.normalize()?;
        let assessment = self.engine.assess(&facts);
        Ok(ScoreOutcome {
            claim_number: facts.claim_number,
            fraud_label: assessment.label,
            fraud_score: assessment.score,
            reasons: assessment.reasons,
        })
    }

    /// All scored claims, newest first
    pub async fn list_scored_claims(&self) -> Result<Vec<ScoredClaim>, FraudError> {
        Ok(self.store.list_claims().await?)
    }

    /// Scoring history of one claim number, newest first
    pub async fn claim_history(&self, claim_number: &str) -> Result<Vec<ScoredClaim>, FraudError> {
        Ok(self.store.find_by_claim_number(claim_number).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::FraudLabel;
    use crate::ports::mock::InMemoryClaimStore;
    use rust_decimal_macros::dec;

    fn service() -> (ClaimScoringService, Arc<InMemoryClaimStore>) {
        let store = Arc::new(InMemoryClaimStore::new());
        (
            ClaimScoringService::new(FraudScoringEngine::standard(), store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn test_score_claim_persists() {
        let (service, store) = service();
        let outcome = service
            .score_claim(
                ClaimScoreRequest::new()
                    .claim_number("C-1002")
                    .policy_number("P-2002")
                    .amount(dec!(450000))
                    .prior_claims(3)
                    .channel("online")
                    .city("unknown"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.fraud_label, FraudLabel::Suspicious);
        assert_eq!(outcome.fraud_score, dec!(90));

        let saved = store.list_claims().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].policy_number, "P-2002");
        assert_eq!(saved[0].fraud_score, dec!(90));
    }

    #[tokio::test]
    async fn test_invalid_claim_is_not_persisted() {
        let (service, store) = service();
        let err = service
            .score_claim(ClaimScoreRequest::new().amount(dec!(-5)))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let (service, store) = service();
        let outcome = service
            .preview(ClaimScoreRequest::new().channel("online"))
            .unwrap();

        assert_eq!(outcome.fraud_score, dec!(15));
        assert!(store.is_empty().await);
    }
}
