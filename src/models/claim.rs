// src/models/claim.rs
// DOCUMENTATION: Business claim records and request/response DTOs
// PURPOSE: Persisted verification outcomes and the payloads of the claim endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::{ClaimData, GmbLocation, MatchResult};

/// Lifecycle of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Verified,
    PendingReview,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Verified => "verified",
            ClaimStatus::PendingReview => "pending_review",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Status implied by a matcher decision
    pub fn from_match(result: &MatchResult) -> Self {
        if result.verified {
            ClaimStatus::Verified
        } else if result.requires_manual_review {
            ClaimStatus::PendingReview
        } else {
            ClaimStatus::Rejected
        }
    }

    /// Moderators may only move a claim out of the review queue, to a final status
    pub fn can_resolve_to(&self, target: ClaimStatus) -> bool {
        *self == ClaimStatus::PendingReview && target != ClaimStatus::PendingReview
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(ClaimStatus::Verified),
            "pending_review" => Ok(ClaimStatus::PendingReview),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(format!("unknown claim status: {}", other)),
        }
    }
}

/// Claim row from `business_claims`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    pub id: Uuid,
    pub business_id: Uuid,
    pub claimant_email: String,
    pub business_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub status: String,
    pub confidence: i32,
    pub requires_manual_review: bool,
    pub match_details: Value,
    pub matched_location: Option<Value>,
    pub failure_reason: Option<String>,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Matched GMB location stored at verification time
    pub fn matched_location(&self) -> Result<Option<GmbLocation>, serde_json::Error> {
        self.matched_location
            .as_ref()
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }
}

/// Insert payload for a new claim
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub business_id: Uuid,
    pub claimant_email: String,
    pub claim: ClaimData,
    pub status: ClaimStatus,
    pub result: MatchResult,
}

/// POST /claims/match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchClaimRequest {
    #[validate]
    pub claim: ClaimData,
    #[serde(default)]
    pub locations: Vec<GmbLocation>,
}

/// POST /claims/verify
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyClaimRequest {
    pub business_id: Uuid,
    #[validate(email)]
    pub claimant_email: String,
    #[validate]
    pub claim: ClaimData,
    #[serde(default)]
    pub locations: Vec<GmbLocation>,
}

/// POST /claims/verify/gmb
/// DOCUMENTATION: Either an access token or an OAuth authorization code is required
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GmbVerifyClaimRequest {
    pub business_id: Uuid,
    #[validate(email)]
    pub claimant_email: String,
    #[validate]
    pub claim: ClaimData,
    pub access_token: Option<String>,
    pub authorization_code: Option<String>,
    pub redirect_uri: Option<String>,
    /// Bypass cached location lists for this claimant's accounts
    #[serde(default)]
    pub refresh_locations: bool,
}

/// Response of both verify endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimVerificationResponse {
    pub claim_id: Uuid,
    pub status: ClaimStatus,
    pub result: MatchResult,
}

/// Admin payload for approving or rejecting a pending claim
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewDecisionRequest {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Query parameters for the moderation queue
#[derive(Debug, Clone, Deserialize)]
pub struct PendingQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Paginated moderation queue
#[derive(Debug, Clone, Serialize)]
pub struct PendingClaimsResponse {
    pub data: Vec<Claim>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}

/// Claim counts by status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimStats {
    pub verified: i64,
    pub pending_review: i64,
    pub rejected: i64,
    pub average_confidence: Option<f64>,
}
