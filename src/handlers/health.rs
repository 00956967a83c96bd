// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Liveness probe, also reports location cache occupancy

use crate::services::LocationsCache;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(cache: Option<web::Data<Arc<LocationsCache>>>) -> impl Responder {
    let cache_stats = match cache {
        Some(cache) => Some(cache.stats().await),
        None => None,
    };

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "azdir-claims",
        "version": env!("CARGO_PKG_VERSION"),
        "location_cache": cache_stats
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
