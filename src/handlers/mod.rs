// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export route configuration for each handler group

pub mod admin;
pub mod claims;
pub mod health;

pub use admin::config as admin_config;
pub use claims::config as claims_config;
pub use health::config as health_config;
