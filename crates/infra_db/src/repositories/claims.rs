//! Scored claim repository
//!
//! Scored claims are append-only; rescoring a claim number adds a row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Scored claim row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoredClaimRow {
    pub scored_claim_id: Uuid,
    pub claim_number: String,
    pub policy_number: String,
    pub amount: Decimal,
    pub channel: String,
    pub city: String,
    pub prior_claims: i32,
    pub fraud_score: Decimal,
    pub fraud_label: String,
    pub created_at: DateTime<Utc>,
}

const CLAIM_COLUMNS: &str = "scored_claim_id, claim_number, policy_number, amount, channel, \
                             city, prior_claims, fraud_score, fraud_label, created_at";

/// Repository for scored claims
#[derive(Debug, Clone)]
pub struct ScoredClaimRepository {
    pool: PgPool,
}

impl ScoredClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a scored claim
    pub async fn insert(&self, claim: ScoredClaimRow) -> Result<ScoredClaimRow, DatabaseError> {
        let sql = format!(
            "INSERT INTO scored_claims ({CLAIM_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {CLAIM_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ScoredClaimRow>(&sql)
            .bind(claim.scored_claim_id)
            .bind(&claim.claim_number)
            .bind(&claim.policy_number)
            .bind(claim.amount)
            .bind(&claim.channel)
            .bind(&claim.city)
            .bind(claim.prior_claims)
            .bind(claim.fraud_score)
            .bind(&claim.fraud_label)
            .bind(claim.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// All scored claims, newest first
    pub async fn list(&self) -> Result<Vec<ScoredClaimRow>, DatabaseError> {
        let sql = format!(
            "SELECT {CLAIM_COLUMNS} FROM scored_claims ORDER BY created_at DESC, scored_claim_id DESC"
        );
        let rows = sqlx::query_as::<_, ScoredClaimRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Scored claims for one claim number, newest first
    pub async fn find_by_claim_number(
        &self,
        claim_number: &str,
    ) -> Result<Vec<ScoredClaimRow>, DatabaseError> {
        let sql = format!(
            "SELECT {CLAIM_COLUMNS} FROM scored_claims WHERE claim_number = $1 \
             ORDER BY created_at DESC, scored_claim_id DESC"
        );
        let rows = sqlx::query_as::<_, ScoredClaimRow>(&sql)
            .bind(claim_number)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
