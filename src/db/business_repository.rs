// src/db/business_repository.rs
// DOCUMENTATION: Business listing database operations
// PURPOSE: Read listings and record the effect of a verified claim

use crate::errors::DirectoryError;
use crate::models::{Business, DataSource};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Listing fields written when a claim is verified
#[derive(Debug, Clone)]
pub struct VerifiedListingUpdate {
    pub business_id: Uuid,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub data_source: DataSource,
    pub gmb_location_name: Option<String>,
}

pub struct BusinessRepository;

impl BusinessRepository {
    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> Result<Business, DirectoryError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Business>(
            r#"
            SELECT id, name, address, city, phone, data_source, is_verified,
                   claimed_at, gmb_location_name, created_at, updated_at
            FROM businesses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to load business {}: {}", id, e);
            DirectoryError::DatabaseError(format!("Get business failed: {}", e))
        })?
        .ok_or_else(|| DirectoryError::NotFound(format!("business {}", id)))
    }

    /// Mark a listing as owner-verified and store the resolved contact fields
    pub async fn apply_verified_claim<'e, E>(
        executor: E,
        update: &VerifiedListingUpdate,
    ) -> Result<Business, DirectoryError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses
            SET
                address = $2,
                phone = $3,
                data_source = $4,
                gmb_location_name = COALESCE($5, gmb_location_name),
                is_verified = true,
                claimed_at = COALESCE(claimed_at, CURRENT_TIMESTAMP),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING id, name, address, city, phone, data_source, is_verified,
                      claimed_at, gmb_location_name, created_at, updated_at
            "#,
        )
        .bind(update.business_id)
        .bind(&update.address)
        .bind(&update.phone)
        .bind(update.data_source.as_str())
        .bind(&update.gmb_location_name)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to verify business {}: {}", update.business_id, e);
            DirectoryError::DatabaseError(format!("Verify business failed: {}", e))
        })?
        .ok_or_else(|| DirectoryError::NotFound(format!("business {}", update.business_id)))
    }
}
