//! Filter vocabulary — static alias tables plus the backend-loaded set of
//! legal facet values.
//!
//! The static tables map colloquial phrasing to canonical backend values.
//! The `FilterOptions` cache holds the facet values actually present in the
//! collection; extraction only ever matches against those, never invents one.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::search_client::{FacetCounts, SearchClient};

/// US state name → postal code, in load order ("florida" → "FL").
pub const US_STATES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Aliases so users can type "full time" or "ft" and we match the DB value.
pub const JOBTYPE_ALIASES: &[(&str, &[&str])] = &[
    ("full-time", &["full time", "fulltime", "ft"]),
    ("part-time", &["part time", "parttime", "pt"]),
    ("prn", &["per diem", "as needed"]),
    ("contract", &["contractor", "temp", "temporary"]),
];

pub const REMOTETYPE_ALIASES: &[(&str, &[&str])] = &[
    ("remote", &["work from home", "wfh", "telecommute", "virtual"]),
    ("hybrid", &["flex", "flexible"]),
    (
        "onsite",
        &["on-site", "in-person", "in person", "on site", "in office"],
    ),
];

/// Title-cased full name for a postal code ("FL" → "Florida"), if known.
pub fn full_state_name(code: &str) -> Option<String> {
    let (name, _) = US_STATES.iter().find(|(_, abbrev)| *abbrev == code)?;
    Some(
        name.split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Legal facet values loaded from the backend, one ordered set per facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub jobtypes: Vec<String>,
    pub remotetypes: Vec<String>,
    pub categories: Vec<String>,
}

/// Process-wide cache of `FilterOptions`.
///
/// Read-mostly: readers take a cheap `Arc` snapshot, the initialize call
/// replaces the whole value. Readers racing a replace see either the old or
/// the new snapshot, never a torn mix.
#[derive(Clone, Default)]
pub struct FilterOptionsCache(Arc<RwLock<Arc<FilterOptions>>>);

impl FilterOptionsCache {
    pub fn snapshot(&self) -> Arc<FilterOptions> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn replace(&self, next: FilterOptions) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(next);
    }
}

/// Builds a `FilterOptions` snapshot from the backend's facet counts.
/// Empty values are skipped; unknown facet fields are ignored.
pub fn options_from_facets(facets: &[FacetCounts]) -> FilterOptions {
    let mut options = FilterOptions::default();

    for facet in facets {
        let values: Vec<String> = facet
            .counts
            .iter()
            .filter(|c| !c.value.is_empty())
            .map(|c| c.value.clone())
            .collect();

        match facet.field_name.as_str() {
            "state" => options.states = values,
            "jobtype" => options.jobtypes = values,
            "remotetype" => options.remotetypes = values,
            "category" => options.categories = values,
            _ => {}
        }
    }

    options
}

/// Loads all available filter values from the backend via faceting.
/// Called on startup and whenever the user asks for a refresh.
pub async fn load_filter_options(
    search: &SearchClient,
    collection: &str,
) -> Result<FilterOptions, AppError> {
    let response = search
        .multi_search(
            json!({
                "collection": collection,
                "q": "*",
                "query_by": "title",
                "facet_by": "state,jobtype,remotetype,category",
                "max_facet_values": 100,
                "per_page": 0,
                "prefix": "false",
            }),
            &[],
        )
        .await?;

    let facets = response
        .results
        .first()
        .map(|r| r.facet_counts.as_slice())
        .unwrap_or_default();
    let options = options_from_facets(facets);

    info!(
        "Filter options loaded: {} states, {} job types, {} remote types, {} categories",
        options.states.len(),
        options.jobtypes.len(),
        options.remotetypes.len(),
        options.categories.len()
    );

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_client::FacetCount;

    fn facet(field: &str, values: &[&str]) -> FacetCounts {
        FacetCounts {
            field_name: field.to_string(),
            counts: values
                .iter()
                .map(|v| FacetCount {
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_options_from_facets_fills_all_four_facets() {
        let facets = vec![
            facet("state", &["FL", "TX", "KY"]),
            facet("jobtype", &["Full-Time", "Part-Time", "PRN"]),
            facet("remotetype", &["Remote", "Hybrid", "On-Site"]),
            facet("category", &["Nursing", "Pharmacy"]),
        ];
        let options = options_from_facets(&facets);
        assert_eq!(options.states, vec!["FL", "TX", "KY"]);
        assert_eq!(options.jobtypes.len(), 3);
        assert_eq!(options.remotetypes.len(), 3);
        assert_eq!(options.categories, vec!["Nursing", "Pharmacy"]);
    }

    #[test]
    fn test_options_from_facets_skips_empty_values_and_unknown_fields() {
        let facets = vec![
            facet("state", &["FL", "", "TX"]),
            facet("salary_band", &["high"]),
        ];
        let options = options_from_facets(&facets);
        assert_eq!(options.states, vec!["FL", "TX"]);
        assert!(options.jobtypes.is_empty());
    }

    /// Same backend response twice → identical snapshot both times.
    #[test]
    fn test_options_from_facets_is_idempotent() {
        let facets = vec![facet("state", &["FL", "TX"]), facet("category", &["Nursing"])];
        assert_eq!(options_from_facets(&facets), options_from_facets(&facets));
    }

    #[test]
    fn test_cache_replace_swaps_whole_snapshot() {
        let cache = FilterOptionsCache::default();
        assert!(cache.snapshot().states.is_empty());

        let old = cache.snapshot();
        cache.replace(FilterOptions {
            states: vec!["FL".to_string()],
            ..Default::default()
        });

        // Old snapshot is unaffected; new readers see the replacement.
        assert!(old.states.is_empty());
        assert_eq!(cache.snapshot().states, vec!["FL"]);
    }

    #[test]
    fn test_full_state_name_title_cases_multiword_names() {
        assert_eq!(full_state_name("FL").as_deref(), Some("Florida"));
        assert_eq!(full_state_name("NH").as_deref(), Some("New Hampshire"));
        assert_eq!(full_state_name("ZZ"), None);
    }

    #[test]
    fn test_alias_tables_cover_expected_colloquialisms() {
        let (_, fulltime_aliases) = JOBTYPE_ALIASES
            .iter()
            .find(|(pattern, _)| *pattern == "full-time")
            .unwrap();
        assert!(fulltime_aliases.contains(&"full time"));

        let (_, remote_aliases) = REMOTETYPE_ALIASES
            .iter()
            .find(|(pattern, _)| *pattern == "remote")
            .unwrap();
        assert!(remote_aliases.contains(&"wfh"));
    }
}
