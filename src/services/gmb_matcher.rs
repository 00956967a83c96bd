// src/services/gmb_matcher.rs
// DOCUMENTATION: Claim-to-GMB business matching
// PURPOSE: Score how well a claimed business matches the owner's GMB locations
// and decide whether the claim is verified, needs review, or is rejected

use crate::models::{ClaimData, GmbAddress, GmbLocation, MatchDetails, MatchResult};
use once_cell::sync::Lazy;
use regex::Regex;
use strsim::levenshtein;

/// Confidence at or above which a claim is verified automatically
pub const AUTO_VERIFY_THRESHOLD: u8 = 85;

/// Confidence at or above which a claim goes to manual review
pub const MANUAL_REVIEW_THRESHOLD: u8 = 60;

const NAME_WEIGHT: f64 = 0.5;
const ADDRESS_WEIGHT: f64 = 0.35;
const PHONE_WEIGHT: f64 = 0.15;

pub const NO_LOCATIONS_REASON: &str = "No GMB locations found for this account";

static STREET_SUFFIXES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:street|st|avenue|ave|road|rd|drive|dr|lane|ln|boulevard|blvd|court|ct|place|pl|way|wy|circle|cir|trail|trl)\b",
    )
    .expect("street suffix pattern is valid")
});

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W").expect("non-word pattern is valid"));

/// Outcome band for a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    Verified,
    ManualReview,
    Rejected,
}

impl MatchDecision {
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= AUTO_VERIFY_THRESHOLD {
            MatchDecision::Verified
        } else if confidence >= MANUAL_REVIEW_THRESHOLD {
            MatchDecision::ManualReview
        } else {
            MatchDecision::Rejected
        }
    }
}

/// GMB matcher
/// DOCUMENTATION: Stateless; every function is total over its inputs
pub struct GmbMatcher;

impl GmbMatcher {
    /// Levenshtein similarity as an integer percentage
    /// DOCUMENTATION: Inputs are trimmed and lower-cased first. Identical
    /// inputs score 100, an empty side scores 0.
    pub fn similarity(a: &str, b: &str) -> u8 {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();

        if a.is_empty() || b.is_empty() {
            return 0;
        }
        if a == b {
            return 100;
        }

        let max_len = a.chars().count().max(b.chars().count());
        if max_len == 0 {
            return 0;
        }

        let distance = levenshtein(&a, &b);
        let score = ((max_len - distance) as f64 / max_len as f64) * 100.0;
        score.round().clamp(0.0, 100.0) as u8
    }

    /// Normalize a free-text address for comparison
    /// DOCUMENTATION: Lower-cases, drops street-type words, turns punctuation
    /// into spaces and collapses whitespace
    ///
    /// "123 N. Main St., Phoenix" -> "123 n main phoenix"
    pub fn normalize_address(address: &str) -> String {
        let lowered = address.to_lowercase();
        let without_suffixes = STREET_SUFFIXES.replace_all(&lowered, "");
        let spaced = NON_WORD.replace_all(&without_suffixes, " ");
        spaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Compare a claimed address with a structured GMB address
    pub fn address_similarity(claim_address: &str, gmb_address: Option<&GmbAddress>) -> u8 {
        let Some(gmb_address) = gmb_address else {
            return 0;
        };

        let claimed = Self::normalize_address(claim_address);
        let listed = Self::normalize_address(&gmb_address.to_single_line());
        Self::similarity(&claimed, &listed)
    }

    /// Digit-only phone comparison
    /// DOCUMENTATION: Equal digits match, and so does containment, which
    /// absorbs a leading country code ("14805551234" vs "480-555-1234")
    pub fn phones_match(a: Option<&str>, b: Option<&str>) -> bool {
        let (Some(a), Some(b)) = (a, b) else {
            return false;
        };

        let a: String = a.chars().filter(char::is_ascii_digit).collect();
        let b: String = b.chars().filter(char::is_ascii_digit).collect();

        if a.is_empty() || b.is_empty() {
            return false;
        }

        a == b || a.contains(&b) || b.contains(&a)
    }

    /// Weighted confidence: name 50%, address 35%, phone 15%
    pub fn confidence(details: &MatchDetails) -> u8 {
        let phone_bonus = if details.phone_match { 100.0 } else { 0.0 };
        let score = f64::from(details.name_match) * NAME_WEIGHT
            + f64::from(details.address_match) * ADDRESS_WEIGHT
            + phone_bonus * PHONE_WEIGHT;
        score.round().clamp(0.0, 100.0) as u8
    }

    /// Score a single candidate location
    pub fn score_location(claim: &ClaimData, location: &GmbLocation) -> (u8, MatchDetails) {
        let details = MatchDetails {
            name_match: Self::similarity(&claim.business_name, location.display_name()),
            address_match: Self::address_similarity(&claim.address, location.address.as_ref()),
            phone_match: Self::phones_match(
                claim.phone.as_deref(),
                location.primary_phone.as_deref(),
            ),
        };
        (Self::confidence(&details), details)
    }

    /// Match a claim against every GMB location and decide the outcome
    /// DOCUMENTATION: The highest-confidence candidate wins. Among equal
    /// maxima the earliest location in the list is kept.
    pub fn match_business_with_gmb(claim: &ClaimData, locations: &[GmbLocation]) -> MatchResult {
        if locations.is_empty() {
            return MatchResult {
                verified: false,
                matched_location: None,
                confidence: 0,
                requires_manual_review: false,
                match_details: MatchDetails::default(),
                failure_reason: Some(NO_LOCATIONS_REASON.to_string()),
                all_locations: Vec::new(),
            };
        }

        let mut best: Option<(usize, u8, MatchDetails)> = None;
        for (idx, location) in locations.iter().enumerate() {
            let (confidence, details) = Self::score_location(claim, location);
            log::debug!(
                "GMB candidate {} ({}): confidence={} name={} address={} phone={}",
                idx,
                location.name,
                confidence,
                details.name_match,
                details.address_match,
                details.phone_match
            );

            if best.map_or(true, |(_, top, _)| confidence > top) {
                best = Some((idx, confidence, details));
            }
        }

        // Non-empty input always yields a candidate
        let (idx, confidence, details) = best.unwrap_or((0, 0, MatchDetails::default()));

        let decision = MatchDecision::from_confidence(confidence);
        let failure_reason = match decision {
            MatchDecision::Rejected => Some(format!(
                "Low confidence match ({}%): business name, address and phone do not sufficiently match any GMB location",
                confidence
            )),
            _ => None,
        };

        MatchResult {
            verified: decision == MatchDecision::Verified,
            matched_location: locations.get(idx).cloned(),
            confidence,
            requires_manual_review: decision == MatchDecision::ManualReview,
            match_details: details,
            failure_reason,
            all_locations: locations.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(name: &str, address: &str, phone: Option<&str>) -> ClaimData {
        ClaimData {
            business_name: name.to_string(),
            address: address.to_string(),
            phone: phone.map(str::to_string),
        }
    }

    fn location(resource: &str, name: &str, lines: &[&str], phone: Option<&str>) -> GmbLocation {
        GmbLocation {
            name: resource.to_string(),
            location_name: Some(name.to_string()),
            address: if lines.is_empty() {
                None
            } else {
                Some(GmbAddress {
                    address_lines: lines.iter().map(|l| l.to_string()).collect(),
                    ..Default::default()
                })
            },
            primary_phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn test_similarity_identical() {
        assert_eq!(GmbMatcher::similarity("Desert Plumbing", "Desert Plumbing"), 100);
        assert_eq!(GmbMatcher::similarity("  desert plumbing ", "DESERT PLUMBING"), 100);
    }

    #[test]
    fn test_similarity_empty_side() {
        assert_eq!(GmbMatcher::similarity("", "anything"), 0);
        assert_eq!(GmbMatcher::similarity("anything", ""), 0);
        assert_eq!(GmbMatcher::similarity("   ", "   "), 0);
    }

    #[test]
    fn test_similarity_partial() {
        // distance 3 over 7 characters
        assert_eq!(GmbMatcher::similarity("kitten", "sitting"), 57);
        assert_eq!(
            GmbMatcher::similarity("Desert Plumbing LLC", "Desert Plumbing"),
            79
        );
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [
            ("Sonoran Pest Control", "Sonoran Pest"),
            ("Mesa Roofing", "Tempe Roofing Co"),
            ("a", "abc"),
        ];
        for (a, b) in pairs {
            assert_eq!(GmbMatcher::similarity(a, b), GmbMatcher::similarity(b, a));
        }
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            GmbMatcher::normalize_address("123 N. Main St., Phoenix, AZ 85004"),
            "123 n main phoenix az 85004"
        );
        assert_eq!(
            GmbMatcher::normalize_address("500 Camelback   Road"),
            "500 camelback"
        );
        // suffixes only match as whole words
        assert_eq!(GmbMatcher::normalize_address("12 Stadium Way"), "12 stadium");
        assert_eq!(GmbMatcher::normalize_address("1st Ave"), "1st");
    }

    #[test]
    fn test_address_similarity_ignores_street_suffix() {
        let gmb = GmbAddress {
            address_lines: vec!["123 Main".to_string()],
            ..Default::default()
        };
        assert_eq!(GmbMatcher::address_similarity("123 Main St", Some(&gmb)), 100);
    }

    #[test]
    fn test_address_similarity_uses_full_structured_address() {
        let gmb = GmbAddress {
            address_lines: vec!["4400 E Broadway Blvd".to_string()],
            locality: Some("Tucson".to_string()),
            administrative_area: Some("AZ".to_string()),
            postal_code: Some("85711".to_string()),
        };
        assert_eq!(
            GmbMatcher::address_similarity("4400 E. Broadway Boulevard, Tucson, AZ 85711", Some(&gmb)),
            100
        );
        assert_eq!(GmbMatcher::address_similarity("4400 E Broadway", None), 0);
    }

    #[test]
    fn test_phones_match() {
        assert!(GmbMatcher::phones_match(Some("480-555-1234"), Some("14805551234")));
        assert!(GmbMatcher::phones_match(Some("(480) 555-1234"), Some("480.555.1234")));
        assert!(!GmbMatcher::phones_match(Some("480-555-1234"), Some("602-555-1234")));
        assert!(!GmbMatcher::phones_match(None, Some("480-555-1234")));
        assert!(!GmbMatcher::phones_match(Some("480-555-1234"), None));
        assert!(!GmbMatcher::phones_match(Some("n/a"), Some("480-555-1234")));
    }

    #[test]
    fn test_confidence_bounds() {
        let perfect = MatchDetails {
            name_match: 100,
            address_match: 100,
            phone_match: true,
        };
        assert_eq!(GmbMatcher::confidence(&perfect), 100);
        assert_eq!(GmbMatcher::confidence(&MatchDetails::default()), 0);

        let partial = MatchDetails {
            name_match: 79,
            address_match: 50,
            phone_match: false,
        };
        // 39.5 + 17.5 = 57
        assert_eq!(GmbMatcher::confidence(&partial), 57);
    }

    #[test]
    fn test_decision_thresholds() {
        assert_eq!(MatchDecision::from_confidence(90), MatchDecision::Verified);
        assert_eq!(MatchDecision::from_confidence(85), MatchDecision::Verified);
        assert_eq!(MatchDecision::from_confidence(84), MatchDecision::ManualReview);
        assert_eq!(MatchDecision::from_confidence(70), MatchDecision::ManualReview);
        assert_eq!(MatchDecision::from_confidence(60), MatchDecision::ManualReview);
        assert_eq!(MatchDecision::from_confidence(59), MatchDecision::Rejected);
        assert_eq!(MatchDecision::from_confidence(40), MatchDecision::Rejected);
    }

    #[test]
    fn test_no_locations() {
        let result = GmbMatcher::match_business_with_gmb(
            &claim("Desert Plumbing", "100 W Camelback Rd", None),
            &[],
        );
        assert!(!result.verified);
        assert_eq!(result.confidence, 0);
        assert!(!result.requires_manual_review);
        assert!(result.matched_location.is_none());
        assert!(result.all_locations.is_empty());
        assert!(!result.failure_reason.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_single_location_verified() {
        let locations = vec![location(
            "accounts/1/locations/1",
            "Desert Plumbing",
            &["100 W Camelback Rd"],
            Some("+1 602-555-0100"),
        )];
        let result = GmbMatcher::match_business_with_gmb(
            &claim("Desert Plumbing", "100 W Camelback Road", Some("602-555-0100")),
            &locations,
        );

        assert!(result.verified);
        assert!(!result.requires_manual_review);
        assert_eq!(result.confidence, 100);
        assert!(result.failure_reason.is_none());
        assert_eq!(result.matched_location, Some(locations[0].clone()));
        assert_eq!(result.all_locations, locations);
    }

    #[test]
    fn test_single_location_manual_review() {
        // name 100, no structured address, phone match: 50 + 0 + 15
        let locations = vec![location(
            "accounts/1/locations/1",
            "Desert Plumbing",
            &[],
            Some("6025550100"),
        )];
        let result = GmbMatcher::match_business_with_gmb(
            &claim("Desert Plumbing", "100 W Camelback Rd", Some("602-555-0100")),
            &locations,
        );

        assert_eq!(result.confidence, 65);
        assert!(!result.verified);
        assert!(result.requires_manual_review);
        assert!(result.failure_reason.is_none());
    }

    #[test]
    fn test_single_location_rejected() {
        // name 100 only: 50
        let locations = vec![location("accounts/1/locations/1", "Desert Plumbing", &[], None)];
        let result = GmbMatcher::match_business_with_gmb(
            &claim("Desert Plumbing", "100 W Camelback Rd", Some("602-555-0100")),
            &locations,
        );

        assert_eq!(result.confidence, 50);
        assert!(!result.verified);
        assert!(!result.requires_manual_review);
        assert!(result.failure_reason.unwrap().contains("50%"));
    }

    #[test]
    fn test_best_candidate_selected() {
        let locations = vec![
            location("accounts/1/locations/1", "Cactus Car Wash", &["9 Elm Ln"], None),
            location(
                "accounts/1/locations/2",
                "Desert Plumbing",
                &["100 W Camelback Rd"],
                Some("602-555-0100"),
            ),
        ];
        let result = GmbMatcher::match_business_with_gmb(
            &claim("Desert Plumbing", "100 W Camelback Rd", Some("602-555-0100")),
            &locations,
        );

        assert_eq!(
            result.matched_location.map(|l| l.name),
            Some("accounts/1/locations/2".to_string())
        );
        assert_eq!(result.all_locations.len(), 2);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let locations = vec![
            location("accounts/1/locations/a", "Desert Plumbing", &["100 W Camelback Rd"], None),
            location("accounts/1/locations/b", "Desert Plumbing", &["100 W Camelback Rd"], None),
        ];
        let result = GmbMatcher::match_business_with_gmb(
            &claim("Desert Plumbing", "100 W Camelback Rd", None),
            &locations,
        );

        assert_eq!(result.confidence, 85);
        assert_eq!(
            result.matched_location.map(|l| l.name),
            Some("accounts/1/locations/a".to_string())
        );
    }
}
