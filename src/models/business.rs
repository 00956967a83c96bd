// src/models/business.rs
// DOCUMENTATION: Directory listing record
// PURPOSE: The subset of a business listing that claim verification reads and updates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Provenance of a listing field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Manual,
    OwnerClaim,
    GoogleMyBusiness,
    GooglePlaces,
    Scraper,
    BulkImport,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Manual => "manual",
            DataSource::OwnerClaim => "owner_claim",
            DataSource::GoogleMyBusiness => "google_my_business",
            DataSource::GooglePlaces => "google_places",
            DataSource::Scraper => "scraper",
            DataSource::BulkImport => "bulk_import",
        }
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(DataSource::Manual),
            "owner_claim" => Ok(DataSource::OwnerClaim),
            "google_my_business" => Ok(DataSource::GoogleMyBusiness),
            "google_places" => Ok(DataSource::GooglePlaces),
            "scraper" => Ok(DataSource::Scraper),
            "bulk_import" => Ok(DataSource::BulkImport),
            other => Err(format!("unknown data source: {}", other)),
        }
    }
}

/// Business listing as stored in the `businesses` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: String,
    pub phone: Option<String>,

    /// Where the current name/address/phone came from (see DataSource)
    pub data_source: String,

    pub is_verified: bool,
    pub claimed_at: Option<DateTime<Utc>>,

    /// GMB resource name of the location the owner verified against
    pub gmb_location_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Parsed provenance; unknown values rank like a bulk import
    pub fn source(&self) -> DataSource {
        self.data_source.parse().unwrap_or_else(|e: String| {
            log::warn!("Business {}: {}", self.id, e);
            DataSource::BulkImport
        })
    }
}
