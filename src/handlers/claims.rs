// src/handlers/claims.rs
// DOCUMENTATION: HTTP handlers for business claims
// PURPOSE: Parse requests, call ClaimService, return responses

use crate::errors::DirectoryError;
use crate::models::{GmbVerifyClaimRequest, MatchClaimRequest, VerifyClaimRequest};
use crate::services::{ClaimService, GmbClient, LocationsCache};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// POST /claims/match
/// Score a claim against supplied locations without recording it
pub async fn match_claim(
    req: web::Json<MatchClaimRequest>,
) -> Result<impl Responder, DirectoryError> {
    let result = ClaimService::match_claim(&req)?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /claims/verify
/// Verify and record a claim against supplied locations
pub async fn verify_claim(
    pool: web::Data<PgPool>,
    req: web::Json<VerifyClaimRequest>,
) -> Result<impl Responder, DirectoryError> {
    let response = ClaimService::verify_claim(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /claims/verify/gmb
/// Verify and record a claim against the claimant's GMB locations
pub async fn verify_claim_with_gmb(
    pool: web::Data<PgPool>,
    client: web::Data<GmbClient>,
    cache: web::Data<Arc<LocationsCache>>,
    req: web::Json<GmbVerifyClaimRequest>,
) -> Result<impl Responder, DirectoryError> {
    let response = ClaimService::verify_with_gmb(
        pool.get_ref(),
        client.get_ref(),
        cache.get_ref(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /claims/{id}
pub async fn get_claim(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    let claim = ClaimService::get_claim(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(claim))
}

/// Configuration for claim routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/claims")
            .route("/match", web::post().to(match_claim))
            .route("/verify", web::post().to(verify_claim))
            .route("/verify/gmb", web::post().to(verify_claim_with_gmb))
            .route("/{id}", web::get().to(get_claim)),
    );
}
