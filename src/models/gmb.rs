// src/models/gmb.rs
// DOCUMENTATION: Google My Business data structures and match results
// PURPOSE: Wire types shared by the GMB client, the matcher and the claim endpoints

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Structured postal address as returned by the GMB API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmbAddress {
    #[serde(default)]
    pub address_lines: Vec<String>,
    pub locality: Option<String>,
    pub administrative_area: Option<String>,
    pub postal_code: Option<String>,
}

impl GmbAddress {
    /// Join the non-empty parts: lines, locality, administrative area, postal code
    pub fn to_single_line(&self) -> String {
        self.address_lines
            .iter()
            .map(String::as_str)
            .chain(self.locality.as_deref())
            .chain(self.administrative_area.as_deref())
            .chain(self.postal_code.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single business location owned by a GMB account
/// DOCUMENTATION: `name` is the API resource name (accounts/x/locations/y),
/// `location_name` the business name shown to customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmbLocation {
    pub name: String,
    pub location_name: Option<String>,
    pub address: Option<GmbAddress>,
    pub primary_phone: Option<String>,
}

impl GmbLocation {
    /// Name used for comparison against the claimed business name
    pub fn display_name(&self) -> &str {
        self.location_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// GMB account that owns locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmbAccount {
    /// Resource name, e.g. "accounts/1234567890"
    pub name: String,
    pub account_name: Option<String>,
}

/// Details asserted by the claimant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClaimData {
    #[validate(length(min = 1, max = 255))]
    pub business_name: String,
    #[validate(length(max = 500))]
    pub address: String,
    pub phone: Option<String>,
}

/// Per-signal breakdown of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub name_match: u8,
    pub address_match: u8,
    pub phone_match: bool,
}

/// Outcome of matching a claim against a set of GMB locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_location: Option<GmbLocation>,
    pub confidence: u8,
    pub requires_manual_review: bool,
    pub match_details: MatchDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub all_locations: Vec<GmbLocation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_deserializes_camel_case() {
        let location: GmbLocation = serde_json::from_value(serde_json::json!({
            "name": "accounts/1/locations/2",
            "locationName": "Desert Plumbing",
            "address": {
                "addressLines": ["100 W Camelback Rd"],
                "locality": "Phoenix",
                "administrativeArea": "AZ",
                "postalCode": "85013"
            },
            "primaryPhone": "(602) 555-0100"
        }))
        .unwrap();

        assert_eq!(location.display_name(), "Desert Plumbing");
        let address = location.address.unwrap();
        assert_eq!(address.locality.as_deref(), Some("Phoenix"));
        assert_eq!(
            address.to_single_line(),
            "100 W Camelback Rd, Phoenix, AZ, 85013"
        );
    }

    #[test]
    fn test_display_name_falls_back_to_resource_name() {
        let location = GmbLocation {
            name: "Mesa Roofing".to_string(),
            location_name: Some("  ".to_string()),
            address: None,
            primary_phone: None,
        };
        assert_eq!(location.display_name(), "Mesa Roofing");
    }

    #[test]
    fn test_single_line_skips_empty_parts() {
        let address = GmbAddress {
            address_lines: vec!["12 Main".to_string(), "".to_string()],
            locality: None,
            administrative_area: Some("AZ".to_string()),
            postal_code: Some(" ".to_string()),
        };
        assert_eq!(address.to_single_line(), "12 Main, AZ");
    }

    #[test]
    fn test_match_result_wire_format() {
        let result = MatchResult {
            verified: false,
            matched_location: None,
            confidence: 0,
            requires_manual_review: false,
            match_details: MatchDetails::default(),
            failure_reason: Some("none".to_string()),
            all_locations: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["requiresManualReview"], false);
        assert_eq!(value["matchDetails"]["name_match"], 0);
        assert_eq!(value["failureReason"], "none");
        assert!(value.get("matchedLocation").is_none());
    }
}
