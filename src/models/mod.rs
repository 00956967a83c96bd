// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export listing, claim and GMB models

pub mod business;
pub mod claim;
pub mod gmb;

pub use business::*;
pub use claim::*;
pub use gmb::*;
