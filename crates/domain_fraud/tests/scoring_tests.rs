//! Tests for claim fraud scoring

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use domain_fraud::{
    ClaimScoreRequest, ClaimScoringService, ClaimStorePort, FraudLabel, FraudRule,
    FraudScoringEngine, InMemoryClaimStore, RuleTable, ScoringConfig,
};

fn service_with(engine: FraudScoringEngine) -> (ClaimScoringService, Arc<InMemoryClaimStore>) {
    let store = Arc::new(InMemoryClaimStore::new());
    (ClaimScoringService::new(engine, store.clone()), store)
}

// ============================================================================
// Reference claims
// ============================================================================

mod reference_claim_tests {
    use super::*;

    #[tokio::test]
    async fn test_high_risk_online_claim() {
        let (service, _) = service_with(FraudScoringEngine::standard());

        let outcome = service
            .score_json(&json!({
                "claim_number": "C-1002",
                "policy_number": "P-2002",
                "amount": 450000,
                "prior_claims": 3,
                "channel": "online",
                "city": "unknown"
            }))
            .await
            .unwrap();

        assert_eq!(outcome.claim_number, "C-1002");
        assert_eq!(outcome.fraud_score, dec!(90));
        assert_eq!(outcome.fraud_label, FraudLabel::Suspicious);
        assert_eq!(outcome.reasons.len(), 4);
    }

    #[tokio::test]
    async fn test_low_risk_agent_claim() {
        let (service, _) = service_with(FraudScoringEngine::standard());

        let outcome = service
            .score_json(&json!({
                "claim_number": "C-1001",
                "policy_number": "P-1001",
                "amount": 12000,
                "prior_claims": 0,
                "channel": "agent",
                "city": "Chennai"
            }))
            .await
            .unwrap();

        assert_eq!(outcome.fraud_score, Decimal::ZERO);
        assert_eq!(outcome.fraud_label, FraudLabel::Ok);
        assert!(outcome.reasons.is_empty());
    }

    #[tokio::test]
    async fn test_outcome_serializes_with_label_strings() {
        let (service, _) = service_with(FraudScoringEngine::standard());
        let outcome = service
            .score_claim(ClaimScoreRequest::new().claim_number("C-7").amount(dec!(350000)))
            .await
            .unwrap();

        // Amount and the defaulted "unknown" city: 50 + 10
        assert_eq!(outcome.fraud_score, dec!(60));

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["claim_number"], "C-7");
        assert_eq!(value["fraud_label"], "SUSPICIOUS");
        assert_eq!(
            value["reasons"],
            json!(["High claim amount > 300k", "Missing/unknown city"])
        );
    }
}

// ============================================================================
// Input handling
// ============================================================================

mod input_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_body_uses_defaults() {
        let (service, store) = service_with(FraudScoringEngine::standard());

        let outcome = service.score_json(&json!({})).await.unwrap();
        assert_eq!(outcome.claim_number, "NA");
        // Empty city counts as unknown
        assert_eq!(outcome.fraud_score, dec!(10));

        let saved = store.list_claims().await.unwrap();
        assert_eq!(saved[0].policy_number, "NA");
    }

    #[tokio::test]
    async fn test_mixed_case_channel_and_city() {
        let (service, _) = service_with(FraudScoringEngine::standard());

        let outcome = service
            .score_json(&json!({"channel": " ONLINE ", "city": "NA"}))
            .await
            .unwrap();
        assert_eq!(outcome.fraud_score, dec!(15));
    }

    #[tokio::test]
    async fn test_non_numeric_amount_rejected() {
        let (service, store) = service_with(FraudScoringEngine::standard());

        let err = service
            .score_json(&json!({"amount": "a lot"}))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_negative_prior_claims_rejected() {
        let (service, _) = service_with(FraudScoringEngine::standard());
        let err = service
            .score_json(&json!({"prior_claims": -1}))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}

// ============================================================================
// Custom rule tables
// ============================================================================

mod custom_rule_tests {
    use super::*;

    #[tokio::test]
    async fn test_added_rule_contributes() {
        let rules = RuleTable::standard()
            .with_rule(
                FraudRule::infallible("night_city", dec!(20), "High-risk city", |c| {
                    c.city == "gotham"
                })
                .unwrap(),
            )
            .unwrap();
        let (service, _) = service_with(FraudScoringEngine::new(rules, ScoringConfig::default()).unwrap());

        let outcome = service
            .score_claim(
                ClaimScoreRequest::new()
                    .amount(dec!(400000))
                    .city("Gotham"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.fraud_score, dec!(70));
        assert_eq!(outcome.fraud_label, FraudLabel::Suspicious);
        assert_eq!(outcome.reasons.last().unwrap(), "High-risk city");
    }

    #[tokio::test]
    async fn test_panicking_rule_is_skipped() {
        let rules = RuleTable::standard()
            .with_rule(
                FraudRule::infallible("broken", dec!(100), "Never", |_| {
                    panic!("rule bug")
                })
                .unwrap(),
            )
            .unwrap();
        let (service, store) =
            service_with(FraudScoringEngine::new(rules, ScoringConfig::default()).unwrap());

        let outcome = service
            .score_claim(ClaimScoreRequest::new().city("pune"))
            .await
            .unwrap();

        assert_eq!(outcome.fraud_score, Decimal::ZERO);
        assert_eq!(store.len().await, 1);
    }
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_rescoring_keeps_history() {
    let (service, _) = service_with(FraudScoringEngine::standard());
    let request = ClaimScoreRequest::new().claim_number("C-1001").city("pune");

    service.score_claim(request.clone()).await.unwrap();
    service
        .score_claim(request.channel("online"))
        .await
        .unwrap();

    let history = service.claim_history("C-1001").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].fraud_score, dec!(5));
    assert_eq!(history[1].fraud_score, Decimal::ZERO);
    assert_eq!(service.list_scored_claims().await.unwrap().len(), 2);
}
