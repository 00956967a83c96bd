// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export matcher, GMB client, cache and claim workflow

pub mod cache;
pub mod claim_service;
pub mod gmb_client;
pub mod gmb_matcher;
pub mod source_priority;

pub use cache::*;
pub use claim_service::*;
pub use gmb_client::*;
pub use gmb_matcher::*;
pub use source_priority::*;
