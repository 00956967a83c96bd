// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export listing and claim repositories

pub mod business_repository;
pub mod claim_repository;

pub use business_repository::*;
pub use claim_repository::*;
