//! Claim store port
//!
//! Scored claims are append-only records. The PostgreSQL implementation lives
//! in `infra_db`; [`mock::InMemoryClaimStore`] backs tests and demos.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::claim::ScoredClaim;

/// Persistence for scored claims
#[async_trait]
pub trait ClaimStorePort: DomainPort + HealthCheckable {
    /// Stores a scored claim and returns it as persisted
    async fn insert_claim(&self, claim: ScoredClaim) -> Result<ScoredClaim, PortError>;

    /// All scored claims, newest first
    async fn list_claims(&self) -> Result<Vec<ScoredClaim>, PortError>;

    /// Scored claims with the given claim number, newest first
    ///
    /// Claim numbers are not unique; rescoring a claim adds a record.
    async fn find_by_claim_number(&self, claim_number: &str)
        -> Result<Vec<ScoredClaim>, PortError>;
}

/// In-memory implementation of ClaimStorePort
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory scored claim store
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimStore {
        claims: Arc<RwLock<Vec<ScoredClaim>>>,
    }

    impl InMemoryClaimStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }
    }

    impl DomainPort for InMemoryClaimStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::always_healthy("in-memory-claim-store")
        }
    }

    #[async_trait]
    impl ClaimStorePort for InMemoryClaimStore {
        async fn insert_claim(&self, claim: ScoredClaim) -> Result<ScoredClaim, PortError> {
            let mut claims = self.claims.write().await;
            if claims.iter().any(|c| c.id == claim.id) {
                return Err(PortError::conflict(format!("Scored claim exists: {}", claim.id)));
            }
            claims.push(claim.clone());
            Ok(claim)
        }

        async fn list_claims(&self) -> Result<Vec<ScoredClaim>, PortError> {
            let claims = self.claims.read().await;
            Ok(claims.iter().rev().cloned().collect())
        }

        async fn find_by_claim_number(
            &self,
            claim_number: &str,
        ) -> Result<Vec<ScoredClaim>, PortError> {
            let claims = self.claims.read().await;
            Ok(claims
                .iter()
                .rev()
                .filter(|c| c.claim_number == claim_number)
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::InMemoryClaimStore;
    use super::*;
    use crate::claim::{ClaimScoreRequest, FraudLabel};
    use rust_decimal_macros::dec;

    fn scored(number: &str) -> ScoredClaim {
        let facts = ClaimScoreRequest::new()
            .claim_number(number)
            .normalize()
            .unwrap();
        ScoredClaim::new(facts, dec!(10), FraudLabel::Ok)
    }

    #[tokio::test]
    async fn test_insert_and_list_newest_first() {
        let store = InMemoryClaimStore::new();
        store.insert_claim(scored("C-1")).await.unwrap();
        store.insert_claim(scored("C-2")).await.unwrap();

        let claims = store.list_claims().await.unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].claim_number, "C-2");
    }

    #[tokio::test]
    async fn test_same_record_twice_conflicts() {
        let store = InMemoryClaimStore::new();
        let claim = scored("C-1");
        store.insert_claim(claim.clone()).await.unwrap();

        assert!(store.insert_claim(claim).await.unwrap_err().is_conflict());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_claim_numbers_may_repeat() {
        let store = InMemoryClaimStore::new();
        store.insert_claim(scored("C-1")).await.unwrap();
        store.insert_claim(scored("C-1")).await.unwrap();
        store.insert_claim(scored("C-9")).await.unwrap();

        assert_eq!(store.find_by_claim_number("C-1").await.unwrap().len(), 2);
        assert!(store.find_by_claim_number("C-404").await.unwrap().is_empty());
    }
}
