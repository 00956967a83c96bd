// src/db/claim_repository.rs
// DOCUMENTATION: Business claim database operations
// PURPOSE: Persist verification outcomes and serve the moderation queue

use crate::errors::DirectoryError;
use crate::models::{Claim, ClaimStats, ClaimStatus, NewClaim};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const CLAIM_COLUMNS: &str = r#"
    id, business_id, claimant_email, business_name, address, phone, status,
    confidence, requires_manual_review, match_details, matched_location,
    failure_reason, reviewer_notes, reviewed_at, created_at, updated_at
"#;

pub struct ClaimRepository;

impl ClaimRepository {
    /// Record a claim together with the matcher's verdict
    pub async fn create_claim<'e, E>(executor: E, new: &NewClaim) -> Result<Claim, DirectoryError>
    where
        E: PgExecutor<'e>,
    {
        let match_details = serde_json::to_value(new.result.match_details)
            .map_err(|e| DirectoryError::InvalidInput(e.to_string()))?;
        let matched_location = new
            .result
            .matched_location
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DirectoryError::InvalidInput(e.to_string()))?;

        let sql = format!(
            r#"
            INSERT INTO business_claims (
                business_id, claimant_email, business_name, address, phone, status,
                confidence, requires_manual_review, match_details, matched_location,
                failure_reason
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            CLAIM_COLUMNS
        );

        sqlx::query_as::<_, Claim>(&sql)
            .bind(new.business_id)
            .bind(&new.claimant_email)
            .bind(&new.claim.business_name)
            .bind(&new.claim.address)
            .bind(&new.claim.phone)
            .bind(new.status.as_str())
            .bind(i32::from(new.result.confidence))
            .bind(new.result.requires_manual_review)
            .bind(match_details)
            .bind(matched_location)
            .bind(&new.result.failure_reason)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                log::error!("Failed to create claim: {}", e);
                DirectoryError::DatabaseError(format!("Create claim failed: {}", e))
            })
    }

    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> Result<Claim, DirectoryError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("SELECT {} FROM business_claims WHERE id = $1", CLAIM_COLUMNS);

        sqlx::query_as::<_, Claim>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("claim {}", id)))
    }

    /// Load a claim and hold its row lock until the transaction ends
    pub async fn get_for_update<'e, E>(executor: E, id: Uuid) -> Result<Claim, DirectoryError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "SELECT {} FROM business_claims WHERE id = $1 FOR UPDATE",
            CLAIM_COLUMNS
        );

        sqlx::query_as::<_, Claim>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("claim {}", id)))
    }

    /// Claims waiting for a moderator, oldest first
    pub async fn list_pending(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Claim>, i64), DirectoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM business_claims
            WHERE status = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
            CLAIM_COLUMNS
        );

        let claims = sqlx::query_as::<_, Claim>(&sql)
            .bind(ClaimStatus::PendingReview.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM business_claims WHERE status = $1")
            .bind(ClaimStatus::PendingReview.as_str())
            .fetch_one(pool)
            .await?;

        Ok((claims, total.0))
    }

    /// Move a pending claim to its final status
    /// DOCUMENTATION: The status guard makes concurrent moderators race safely;
    /// the loser gets None
    pub async fn resolve_pending<'e, E>(
        executor: E,
        id: Uuid,
        status: ClaimStatus,
        notes: Option<&str>,
    ) -> Result<Option<Claim>, DirectoryError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            UPDATE business_claims
            SET
                status = $2,
                requires_manual_review = false,
                reviewer_notes = $3,
                reviewed_at = CURRENT_TIMESTAMP,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = $4
            RETURNING {}
            "#,
            CLAIM_COLUMNS
        );

        let claim = sqlx::query_as::<_, Claim>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(notes)
            .bind(ClaimStatus::PendingReview.as_str())
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                log::error!("Failed to resolve claim {}: {}", id, e);
                DirectoryError::DatabaseError(format!("Resolve claim failed: {}", e))
            })?;

        Ok(claim)
    }

    pub async fn stats(pool: &PgPool) -> Result<ClaimStats, DirectoryError> {
        let counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM business_claims GROUP BY status")
                .fetch_all(pool)
                .await?;

        let average: (Option<f64>,) =
            sqlx::query_as("SELECT AVG(confidence)::float8 FROM business_claims")
                .fetch_one(pool)
                .await?;

        let mut stats = ClaimStats {
            average_confidence: average.0,
            ..Default::default()
        };

        for (status, count) in counts {
            match status.parse::<ClaimStatus>() {
                Ok(ClaimStatus::Verified) => stats.verified = count,
                Ok(ClaimStatus::PendingReview) => stats.pending_review = count,
                Ok(ClaimStatus::Rejected) => stats.rejected = count,
                Err(e) => log::warn!("Skipping claims with {}", e),
            }
        }

        Ok(stats)
    }
}
