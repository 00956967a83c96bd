// src/services/claim_service.rs
// DOCUMENTATION: Business claim verification workflow
// PURPOSE: Intermediary between handlers, the GMB matcher, the GMB API and the repositories

use crate::db::{BusinessRepository, ClaimRepository, VerifiedListingUpdate};
use crate::errors::DirectoryError;
use crate::models::{
    Business, Claim, ClaimData, ClaimStats, ClaimStatus, ClaimVerificationResponse, DataSource,
    GmbLocation, GmbVerifyClaimRequest, MatchClaimRequest, MatchResult, NewClaim,
    PendingClaimsResponse, VerifyClaimRequest,
};
use crate::services::{GmbClient, GmbMatcher, LocationsCache, SourcePriority, SourcedValue};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

/// Deepest page of the moderation queue that can be requested
const MAX_PENDING_PAGE: i64 = 10_000;

/// Matcher verdict for a claim plus the listing change it implies
struct VerificationPlan {
    result: MatchResult,
    status: ClaimStatus,
    listing: Option<VerifiedListingUpdate>,
}

pub struct ClaimService;

impl ClaimService {
    /// Score a claim without recording anything
    pub fn match_claim(req: &MatchClaimRequest) -> Result<MatchResult, DirectoryError> {
        req.validate()?;
        Ok(GmbMatcher::match_business_with_gmb(&req.claim, &req.locations))
    }

    /// Verify a claim against caller-supplied GMB locations
    pub async fn verify_claim(
        pool: &PgPool,
        req: VerifyClaimRequest,
    ) -> Result<ClaimVerificationResponse, DirectoryError> {
        req.validate()?;

        let business = BusinessRepository::get_by_id(pool, req.business_id).await?;
        Self::record_verification(pool, &business, req.claimant_email, req.claim, &req.locations)
            .await
    }

    /// Verify a claim against the claimant's own GMB locations
    /// DOCUMENTATION: Uses the supplied access token, or exchanges the OAuth
    /// authorization code for one, then pulls locations for every account
    pub async fn verify_with_gmb(
        pool: &PgPool,
        client: &GmbClient,
        cache: &LocationsCache,
        req: GmbVerifyClaimRequest,
    ) -> Result<ClaimVerificationResponse, DirectoryError> {
        req.validate()?;

        let business = BusinessRepository::get_by_id(pool, req.business_id).await?;

        let access_token = match (&req.access_token, &req.authorization_code) {
            (Some(token), _) if !token.trim().is_empty() => token.clone(),
            (_, Some(code)) if !code.trim().is_empty() => {
                let redirect_uri = req.redirect_uri.as_deref().ok_or_else(|| {
                    DirectoryError::InvalidInput(
                        "redirectUri is required with an authorization code".to_string(),
                    )
                })?;
                client.exchange_code(code, redirect_uri).await?.access_token
            }
            _ => {
                return Err(DirectoryError::InvalidInput(
                    "accessToken or authorizationCode is required".to_string(),
                ))
            }
        };

        let locations =
            Self::fetch_locations(client, cache, &access_token, req.refresh_locations).await?;

        Self::record_verification(pool, &business, req.claimant_email, req.claim, &locations).await
    }

    /// Gather locations across all accounts, cache first
    async fn fetch_locations(
        client: &GmbClient,
        cache: &LocationsCache,
        access_token: &str,
        refresh: bool,
    ) -> Result<Vec<GmbLocation>, DirectoryError> {
        let accounts = client.list_accounts(access_token).await?;
        let mut locations = Vec::new();

        for account in &accounts {
            let key = LocationsCache::generate_key(&account.name);
            if refresh {
                cache.invalidate(&key).await;
            } else if let Some(cached) = cache.get(&key).await {
                locations.extend(cached);
                continue;
            }

            let fetched = client.list_locations(access_token, &account.name).await?;
            cache.set(key, fetched.clone()).await;
            locations.extend(fetched);
        }

        Ok(locations)
    }

    /// Score a claim and work out what verifying it would write
    fn plan_verification(
        business: &Business,
        claim: &ClaimData,
        locations: &[GmbLocation],
    ) -> VerificationPlan {
        let result = GmbMatcher::match_business_with_gmb(claim, locations);
        let status = ClaimStatus::from_match(&result);
        let listing = match (status, result.matched_location.as_ref()) {
            (ClaimStatus::Verified, Some(location)) => {
                Some(Self::listing_update(business, location))
            }
            _ => None,
        };

        VerificationPlan {
            result,
            status,
            listing,
        }
    }

    /// Store the claim and, when verified, update the listing in one transaction
    async fn record_verification(
        pool: &PgPool,
        business: &Business,
        claimant_email: String,
        claim: ClaimData,
        locations: &[GmbLocation],
    ) -> Result<ClaimVerificationResponse, DirectoryError> {
        let plan = Self::plan_verification(business, &claim, locations);

        log::info!(
            "Claim for business {} by {}: status={}, confidence={}, candidates={}",
            business.id,
            claimant_email,
            plan.status,
            plan.result.confidence,
            locations.len()
        );

        let new_claim = NewClaim {
            business_id: business.id,
            claimant_email,
            claim,
            status: plan.status,
            result: plan.result,
        };

        let mut tx = pool.begin().await?;
        let stored = ClaimRepository::create_claim(&mut *tx, &new_claim).await?;
        if let Some(ref update) = plan.listing {
            Self::apply_to_listing(&mut tx, update).await?;
        }
        tx.commit().await?;

        Ok(ClaimVerificationResponse {
            claim_id: stored.id,
            status: plan.status,
            result: new_claim.result,
        })
    }

    /// Write the verified location's contact details onto the listing
    async fn apply_to_listing(
        tx: &mut Transaction<'_, Postgres>,
        update: &VerifiedListingUpdate,
    ) -> Result<Business, DirectoryError> {
        let updated = BusinessRepository::apply_verified_claim(&mut **tx, update).await?;
        log::info!(
            "Business {} verified via {} (data source: {})",
            updated.id,
            update.gmb_location_name.as_deref().unwrap_or("-"),
            updated.data_source
        );
        Ok(updated)
    }

    /// Resolve address and phone between the listing and the GMB location
    /// DOCUMENTATION: Provenance moves to google_my_business only when a GMB
    /// value actually replaced the listing's own
    fn listing_update(business: &Business, location: &GmbLocation) -> VerifiedListingUpdate {
        let incumbent = business.source();
        let gmb_address = location
            .address
            .as_ref()
            .map(|a| a.to_single_line())
            .unwrap_or_default();

        let pick = |current: Option<&str>, gmb: Option<&str>| -> Option<(DataSource, String)> {
            SourcePriority::resolve(&[
                SourcedValue {
                    source: incumbent,
                    value: current.unwrap_or_default(),
                },
                SourcedValue {
                    source: DataSource::GoogleMyBusiness,
                    value: gmb.unwrap_or_default(),
                },
            ])
            .map(|winner| (winner.source, winner.value.to_string()))
        };

        let address = pick(business.address.as_deref(), Some(gmb_address.as_str()));
        let phone = pick(business.phone.as_deref(), location.primary_phone.as_deref());

        let gmb_won = [&address, &phone]
            .iter()
            .any(|field| matches!(field, Some((DataSource::GoogleMyBusiness, _))));
        let data_source =
            if gmb_won && SourcePriority::outranks(DataSource::GoogleMyBusiness, incumbent) {
                DataSource::GoogleMyBusiness
            } else {
                incumbent
            };

        VerifiedListingUpdate {
            business_id: business.id,
            address: address.map(|(_, value)| value),
            phone: phone.map(|(_, value)| value),
            data_source,
            gmb_location_name: Some(location.name.clone()),
        }
    }

    pub async fn get_claim(pool: &PgPool, id: Uuid) -> Result<Claim, DirectoryError> {
        ClaimRepository::get_by_id(pool, id).await
    }

    /// Moderator approval of a claim from the manual-review band
    /// DOCUMENTATION: The status change and the listing update commit together;
    /// on any failure the claim stays in the queue
    pub async fn approve_claim(
        pool: &PgPool,
        id: Uuid,
        notes: Option<&str>,
    ) -> Result<Claim, DirectoryError> {
        let mut tx = pool.begin().await?;
        let claim = Self::resolve(&mut tx, id, ClaimStatus::Verified, notes).await?;

        let location = Self::approval_location(&claim)?;
        let business = BusinessRepository::get_by_id(&mut *tx, claim.business_id).await?;
        let update = Self::listing_update(&business, &location);
        Self::apply_to_listing(&mut tx, &update).await?;

        tx.commit().await?;
        log::info!("Claim {} approved by moderator", id);
        Ok(claim)
    }

    /// Moderator rejection of a claim from the manual-review band
    pub async fn reject_claim(
        pool: &PgPool,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Claim, DirectoryError> {
        let mut tx = pool.begin().await?;
        let claim = Self::resolve(&mut tx, id, ClaimStatus::Rejected, reason).await?;
        tx.commit().await?;

        log::info!("Claim {} rejected by moderator", id);
        Ok(claim)
    }

    /// Location an approval writes onto the listing
    fn approval_location(claim: &Claim) -> Result<GmbLocation, DirectoryError> {
        claim
            .matched_location()
            .map_err(|e| {
                log::error!("Claim {} has an unreadable matched location: {}", claim.id, e);
                DirectoryError::DatabaseError(format!(
                    "Stored matched location for claim {} is invalid: {}",
                    claim.id, e
                ))
            })?
            .ok_or_else(|| {
                DirectoryError::InvalidInput(format!(
                    "claim {} has no matched GMB location to approve",
                    claim.id
                ))
            })
    }

    /// Check a moderator decision against the claim's current status
    fn check_transition(claim: &Claim, target: ClaimStatus) -> Result<(), DirectoryError> {
        let current: ClaimStatus = claim.status.parse().map_err(DirectoryError::DatabaseError)?;
        if current.can_resolve_to(target) {
            return Ok(());
        }

        Err(DirectoryError::InvalidInput(format!(
            "claim {} is {}, only pending_review claims can be resolved",
            claim.id, current
        )))
    }

    async fn resolve(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        target: ClaimStatus,
        notes: Option<&str>,
    ) -> Result<Claim, DirectoryError> {
        let current = ClaimRepository::get_for_update(&mut **tx, id).await?;
        Self::check_transition(&current, target)?;

        ClaimRepository::resolve_pending(&mut **tx, id, target, notes)
            .await?
            .ok_or_else(|| {
                DirectoryError::InvalidInput(format!("claim {} is no longer pending_review", id))
            })
    }

    /// Normalize queue paging to (page, limit, offset)
    fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
        let limit = limit.unwrap_or(20).clamp(1, 100);
        let page = page.unwrap_or(1).clamp(1, MAX_PENDING_PAGE);
        (page, limit, (page - 1) * limit)
    }

    pub async fn pending_claims(
        pool: &PgPool,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PendingClaimsResponse, DirectoryError> {
        let (page, limit, offset) = Self::page_window(page, limit);

        let (claims, total_count) = ClaimRepository::list_pending(pool, limit, offset).await?;

        Ok(PendingClaimsResponse {
            data: claims,
            total_count,
            page,
            limit,
            has_more: total_count > page * limit,
        })
    }

    pub async fn claim_stats(pool: &PgPool) -> Result<ClaimStats, DirectoryError> {
        ClaimRepository::stats(pool).await
    }
}
