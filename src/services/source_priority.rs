// src/services/source_priority.rs
// DOCUMENTATION: Listing field conflict resolution
// PURPOSE: Pick the value of each listing field from the most trusted data source

use crate::models::DataSource;

/// Sources ordered from most to least trusted
pub const SOURCE_PRIORITY: [DataSource; 6] = [
    DataSource::Manual,
    DataSource::OwnerClaim,
    DataSource::GoogleMyBusiness,
    DataSource::GooglePlaces,
    DataSource::Scraper,
    DataSource::BulkImport,
];

/// A candidate value for one field together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedValue<'a> {
    pub source: DataSource,
    pub value: &'a str,
}

pub struct SourcePriority;

impl SourcePriority {
    /// Rank of a source; lower is more trusted
    pub fn rank(source: DataSource) -> usize {
        SOURCE_PRIORITY
            .iter()
            .position(|s| *s == source)
            .unwrap_or(SOURCE_PRIORITY.len())
    }

    /// Whether `challenger` may overwrite a value that came from `incumbent`
    pub fn outranks(challenger: DataSource, incumbent: DataSource) -> bool {
        Self::rank(challenger) < Self::rank(incumbent)
    }

    /// Choose the winning value among candidates for a single field
    /// DOCUMENTATION: Blank values never win; among equal ranks the first
    /// candidate is kept
    pub fn resolve<'a>(candidates: &[SourcedValue<'a>]) -> Option<SourcedValue<'a>> {
        candidates
            .iter()
            .filter(|c| !c.value.trim().is_empty())
            .fold(None, |best: Option<&SourcedValue<'a>>, candidate| match best {
                Some(current) if Self::rank(current.source) <= Self::rank(candidate.source) => {
                    Some(current)
                }
                _ => Some(candidate),
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert_eq!(SourcePriority::rank(DataSource::Manual), 0);
        assert_eq!(SourcePriority::rank(DataSource::BulkImport), 5);
        assert!(SourcePriority::outranks(
            DataSource::GoogleMyBusiness,
            DataSource::GooglePlaces
        ));
        assert!(!SourcePriority::outranks(
            DataSource::GoogleMyBusiness,
            DataSource::OwnerClaim
        ));
        assert!(!SourcePriority::outranks(
            DataSource::Scraper,
            DataSource::Scraper
        ));
    }

    #[test]
    fn test_resolve_prefers_higher_priority() {
        let candidates = [
            SourcedValue { source: DataSource::Scraper, value: "480-555-0000" },
            SourcedValue { source: DataSource::GoogleMyBusiness, value: "480-555-1234" },
            SourcedValue { source: DataSource::BulkImport, value: "480-555-9999" },
        ];
        let winner = SourcePriority::resolve(&candidates).unwrap();
        assert_eq!(winner.source, DataSource::GoogleMyBusiness);
        assert_eq!(winner.value, "480-555-1234");
    }

    #[test]
    fn test_resolve_skips_blank_values() {
        let candidates = [
            SourcedValue { source: DataSource::Manual, value: "  " },
            SourcedValue { source: DataSource::GooglePlaces, value: "12 Main St" },
        ];
        assert_eq!(
            SourcePriority::resolve(&candidates).map(|w| w.value),
            Some("12 Main St")
        );
        assert!(SourcePriority::resolve(&[]).is_none());
    }

    #[test]
    fn test_resolve_keeps_first_on_equal_rank() {
        let candidates = [
            SourcedValue { source: DataSource::Scraper, value: "first" },
            SourcedValue { source: DataSource::Scraper, value: "second" },
        ];
        assert_eq!(
            SourcePriority::resolve(&candidates).map(|w| w.value),
            Some("first")
        );
    }
}
