//! PostgreSQL Claim Score Store
//!
//! Implements `ClaimStorePort` on top of [`ScoredClaimRepository`].

use async_trait::async_trait;
use tracing::instrument;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, ScoredClaimId};
use domain_fraud::{ClaimStorePort, FraudLabel, ScoredClaim};

use crate::error::DatabaseError;
use crate::repositories::claims::{ScoredClaimRepository, ScoredClaimRow};

/// PostgreSQL-backed implementation of the ClaimStorePort trait
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ScoredClaimRepository,
    pool: sqlx::PgPool,
}

impl PostgresClaimStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            repository: ScoredClaimRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &ScoredClaimRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::probe(&self.pool, "postgres-claim-store").await
    }
}

#[async_trait]
impl ClaimStorePort for PostgresClaimStore {
    #[instrument(skip(self, claim), fields(claim_number = %claim.claim_number))]
    async fn insert_claim(&self, claim: ScoredClaim) -> Result<ScoredClaim, PortError> {
        let row = self.repository.insert(claim_to_row(claim)?).await?;
        row_to_claim(row)
    }

    async fn list_claims(&self) -> Result<Vec<ScoredClaim>, PortError> {
        self.repository
            .list()
            .await?
            .into_iter()
            .map(row_to_claim)
            .collect()
    }

    #[instrument(skip(self))]
    async fn find_by_claim_number(
        &self,
        claim_number: &str,
    ) -> Result<Vec<ScoredClaim>, PortError> {
        self.repository
            .find_by_claim_number(claim_number)
            .await?
            .into_iter()
            .map(row_to_claim)
            .collect()
    }
}

fn claim_to_row(claim: ScoredClaim) -> Result<ScoredClaimRow, PortError> {
    let prior_claims = i32::try_from(claim.prior_claims).map_err(|_| {
        PortError::validation_field(
            format!("prior_claims {} is out of range", claim.prior_claims),
            "prior_claims",
        )
    })?;

    Ok(ScoredClaimRow {
        scored_claim_id: claim.id.into(),
        claim_number: claim.claim_number,
        policy_number: claim.policy_number,
        amount: claim.amount,
        channel: claim.channel,
        city: claim.city,
        prior_claims,
        fraud_score: claim.fraud_score,
        fraud_label: claim.fraud_label.as_str().to_string(),
        created_at: claim.created_at,
    })
}

fn row_to_claim(row: ScoredClaimRow) -> Result<ScoredClaim, PortError> {
    let corrupt = |detail: String| {
        PortError::from(DatabaseError::CorruptRow(format!(
            "scored claim {}: {}",
            row.scored_claim_id, detail
        )))
    };

    let fraud_label: FraudLabel = row
        .fraud_label
        .parse()
        .map_err(|e: domain_fraud::FraudError| corrupt(e.to_string()))?;
    let prior_claims = u32::try_from(row.prior_claims)
        .map_err(|_| corrupt(format!("negative prior_claims {}", row.prior_claims)))?;

    Ok(ScoredClaim {
        id: ScoredClaimId::from(row.scored_claim_id),
        claim_number: row.claim_number,
        policy_number: row.policy_number,
        amount: row.amount,
        channel: row.channel,
        city: row.city,
        prior_claims,
        fraud_score: row.fraud_score,
        fraud_label,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_fraud::ClaimScoreRequest;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_claim_row_conversion_keeps_fields() {
        let facts = ClaimScoreRequest::new()
            .claim_number("C-1002")
            .policy_number("P-2002")
            .amount(dec!(450000))
            .prior_claims(3)
            .channel("online")
            .city("unknown")
            .normalize()
            .unwrap();
        let claim = ScoredClaim::new(facts, dec!(90), FraudLabel::Suspicious);

        let row = claim_to_row(claim.clone()).unwrap();
        assert_eq!(row.fraud_label, "SUSPICIOUS");
        assert_eq!(row.prior_claims, 3);

        assert_eq!(row_to_claim(row).unwrap(), claim);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let facts = ClaimScoreRequest::new().normalize().unwrap();
        let mut row = claim_to_row(ScoredClaim::new(facts, dec!(0), FraudLabel::Ok)).unwrap();
        row.fraud_label = "MAYBE".to_string();

        assert!(row_to_claim(row).is_err());
    }

    proptest! {
        #[test]
        fn prop_prior_claims_fit_the_column(count in any::<u32>()) {
            let facts = ClaimScoreRequest::new().normalize().unwrap();
            let mut claim = ScoredClaim::new(facts, dec!(0), FraudLabel::Ok);
            claim.prior_claims = count;

            match claim_to_row(claim) {
                Ok(row) => prop_assert_eq!(row_to_claim(row).unwrap().prior_claims, count),
                Err(e) => {
                    prop_assert!(count > i32::MAX as u32);
                    let is_validation = matches!(e, PortError::Validation { .. });
                    prop_assert!(is_validation);
                }
            }
        }
    }
}
