// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, GMB client and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{start_cleanup_task, GmbClient, LocationsCache};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting azdir-claims service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. GMB client (shared rate limiter) and location cache
    let gmb_client = match GmbClient::from_config(&config) {
        Ok(client) => web::Data::new(client),
        Err(e) => {
            log::error!("Failed to initialize GMB client: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "GMB client ready ({} requests/minute)",
        config.gmb_requests_per_minute
    );

    let cache = Arc::new(LocationsCache::new(config.gmb_cache_ttl_seconds));
    start_cleanup_task(cache.clone(), 300);
    log::info!(
        "Initialized GMB location cache (TTL: {}s)",
        config.gmb_cache_ttl_seconds
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config_data.clone())
            .app_data(gmb_client.clone())
            .app_data(web::Data::new(cache.clone()))
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .configure(handlers::health_config)
            .configure(handlers::claims_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
