// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for claim moderation
// PURPOSE: Expose the manual-review queue and approve/reject actions

use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::{PendingQuery, ReviewDecisionRequest};
use crate::services::ClaimService;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// GET /admin/claims/pending
/// Claims that landed in the manual-review band, oldest first
pub async fn pending_claims(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    query: web::Query<PendingQuery>,
) -> Result<impl Responder, DirectoryError> {
    verify_admin_token(&req, &config)?;

    let response = ClaimService::pending_claims(pool.get_ref(), query.page, query.limit).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /admin/claims/{id}/approve
pub async fn approve_claim(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewDecisionRequest>>,
) -> Result<impl Responder, DirectoryError> {
    verify_admin_token(&req, &config)?;

    let decision = body.map(|b| b.into_inner()).unwrap_or_default();
    decision.validate()?;

    let claim_id = path.into_inner();
    log::info!("Admin approval requested for claim {}", claim_id);

    let claim =
        ClaimService::approve_claim(pool.get_ref(), claim_id, decision.notes.as_deref()).await?;
    Ok(HttpResponse::Ok().json(claim))
}

/// POST /admin/claims/{id}/reject
pub async fn reject_claim(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReviewDecisionRequest>>,
) -> Result<impl Responder, DirectoryError> {
    verify_admin_token(&req, &config)?;

    let decision = body.map(|b| b.into_inner()).unwrap_or_default();
    decision.validate()?;

    let claim_id = path.into_inner();
    log::info!("Admin rejection requested for claim {}", claim_id);

    let claim =
        ClaimService::reject_claim(pool.get_ref(), claim_id, decision.notes.as_deref()).await?;
    Ok(HttpResponse::Ok().json(claim))
}

/// GET /admin/claims/stats
pub async fn claim_stats(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, DirectoryError> {
    verify_admin_token(&req, &config)?;

    let stats = ClaimService::claim_stats(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), DirectoryError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            DirectoryError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(DirectoryError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/claims")
            .route("/pending", web::get().to(pending_claims))
            .route("/stats", web::get().to(claim_stats))
            .route("/{id}/approve", web::post().to(approve_claim))
            .route("/{id}/reject", web::post().to(reject_claim)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config_with_token(token: &str) -> Config {
        let mut config = Config::from_env();
        config.admin_token = token.to_string();
        config
    }

    #[test]
    fn test_admin_token_missing() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            verify_admin_token(&req, &config_with_token("s3cret")),
            Err(DirectoryError::Unauthorized)
        ));
    }

    #[test]
    fn test_admin_token_mismatch() {
        let req = TestRequest::default()
            .insert_header(("X-Admin-Token", "wrong"))
            .to_http_request();
        assert!(matches!(
            verify_admin_token(&req, &config_with_token("s3cret")),
            Err(DirectoryError::Forbidden)
        ));
    }

    #[test]
    fn test_admin_token_accepted() {
        let req = TestRequest::default()
            .insert_header(("X-Admin-Token", "s3cret"))
            .to_http_request();
        assert!(verify_admin_token(&req, &config_with_token("s3cret")).is_ok());
    }
}
