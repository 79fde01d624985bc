//! Filter extractor — parses a natural-language query into structured
//! filterable criteria (state, job type, remote type, category).
//!
//! Pure and deterministic: matches only against values present in the loaded
//! `FilterOptions`, one value per facet, first successful match wins.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::filters::vocabulary::{
    FilterOptions, JOBTYPE_ALIASES, REMOTETYPE_ALIASES, US_STATES,
};

/// At most one detected value per facet. Absent fields mean "no match",
/// never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remotetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Parses a natural-language query and extracts filterable criteria.
pub fn extract_filters(query: &str, options: &FilterOptions) -> ExtractedFilters {
    let query_lower = query.to_lowercase();
    let mut filters = ExtractedFilters::default();

    // Pass 1: full state names → postal code, but only codes the backend
    // actually has. First match wins.
    for (name, code) in US_STATES {
        if query_lower.contains(name) && options.states.iter().any(|s| s == code) {
            filters.state = Some((*code).to_string());
            break;
        }
    }

    // Pass 2: bare postal codes typed directly. Case-sensitive against the
    // original text on a word boundary — lower-cased codes collide with
    // common words ("in", "or", "me").
    if filters.state.is_none() {
        for code in &options.states {
            if contains_word(query, code) {
                filters.state = Some(code.clone());
                break;
            }
        }
    }

    filters.jobtype = find_match_in_values(&query_lower, &options.jobtypes, JOBTYPE_ALIASES);
    filters.remotetype =
        find_match_in_values(&query_lower, &options.remotetypes, REMOTETYPE_ALIASES);
    filters.category = find_match_in_values(&query_lower, &options.categories, &[]);

    filters
}

/// Case-sensitive whole-word containment.
fn contains_word(text: &str, word: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    Regex::new(&pattern)
        .expect("escaped word pattern is always a valid regex")
        .is_match(text)
}

/// Matches a lower-cased query against known backend values, then against the
/// alias table. Aliases resolve to the first backend value whose normalized
/// form (separators stripped) contains the canonical pattern.
fn find_match_in_values(
    query_lower: &str,
    values: &[String],
    aliases: &[(&str, &[&str])],
) -> Option<String> {
    // Direct substring match
    for value in values {
        if query_lower.contains(&value.to_lowercase()) {
            return Some(value.clone());
        }
    }

    // Alias match
    for (pattern, alias_list) in aliases {
        if query_lower.contains(pattern) {
            for value in values {
                let value_lower = value.to_lowercase();
                if value_lower == *pattern || value_lower.contains(pattern) {
                    return Some(value.clone());
                }
            }
        }
        for alias in *alias_list {
            if query_lower.contains(alias) {
                let pattern_norm = normalize(pattern);
                for value in values {
                    if normalize(&value.to_lowercase()).contains(&pattern_norm) {
                        return Some(value.clone());
                    }
                }
            }
        }
    }

    None
}

fn normalize(s: &str) -> String {
    s.replace(['-', ' '], "")
}
