//! Filter expression builder — turns extracted filters into the backend's
//! `filter_by` string, plus the human-readable summary shown in the UI.

use crate::filters::extractor::ExtractedFilters;
use crate::filters::vocabulary::full_state_name;

/// Builds a `filter_by` expression from the merged filters.
///
/// Clause order is fixed (state, jobtype, remotetype, category) so the
/// expression is deterministic and testable byte-for-byte. Returns `None`
/// when no facet is present.
pub fn build_filter_by(filters: &ExtractedFilters) -> Option<String> {
    let mut clauses = Vec::new();

    if let Some(state) = &filters.state {
        clauses.push(format!("state:={state}"));
    }
    if let Some(jobtype) = &filters.jobtype {
        clauses.push(format!("jobtype:=`{jobtype}`"));
    }
    if let Some(remotetype) = &filters.remotetype {
        clauses.push(format!("remotetype:=`{remotetype}`"));
    }
    if let Some(category) = &filters.category {
        clauses.push(format!("category:=`{category}`"));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" && "))
    }
}

/// Renders the active filters for display, one labelled part per present
/// facet. Returns `None` when nothing is set.
pub fn format_filters_display(filters: &ExtractedFilters) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(state) = &filters.state {
        match full_state_name(state) {
            Some(name) => parts.push(format!("State: {name} ({state})")),
            None => parts.push(format!("State: {state}")),
        }
    }
    if let Some(jobtype) = &filters.jobtype {
        parts.push(format!("Job type: {jobtype}"));
    }
    if let Some(remotetype) = &filters.remotetype {
        parts.push(format!("Work setting: {remotetype}"));
    }
    if let Some(category) = &filters.category {
        parts.push(format!("Category: {category}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" • "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::extractor::extract_filters;
    use crate::filters::vocabulary::FilterOptions;

    #[test]
    fn test_empty_filters_build_no_expression() {
        assert_eq!(build_filter_by(&ExtractedFilters::default()), None);
    }

    #[test]
    fn test_single_state_clause() {
        let filters = ExtractedFilters {
            state: Some("FL".into()),
            ..Default::default()
        };
        assert_eq!(build_filter_by(&filters).as_deref(), Some("state:=FL"));
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let filters = ExtractedFilters {
            category: Some("Nursing".into()),
            state: Some("FL".into()),
            ..Default::default()
        };
        // State always precedes category regardless of construction order.
        assert_eq!(
            build_filter_by(&filters).as_deref(),
            Some("state:=FL && category:=`Nursing`")
        );
    }

    #[test]
    fn test_all_four_clauses_joined_with_and() {
        let filters = ExtractedFilters {
            state: Some("TX".into()),
            jobtype: Some("Full-Time".into()),
            remotetype: Some("Remote".into()),
            category: Some("Pharmacy".into()),
        };
        assert_eq!(
            build_filter_by(&filters).as_deref(),
            Some("state:=TX && jobtype:=`Full-Time` && remotetype:=`Remote` && category:=`Pharmacy`")
        );
    }

    #[test]
    fn test_multiword_values_are_backtick_quoted() {
        let filters = ExtractedFilters {
            category: Some("Home Health".into()),
            ..Default::default()
        };
        assert_eq!(
            build_filter_by(&filters).as_deref(),
            Some("category:=`Home Health`")
        );
    }

    #[test]
    fn test_display_none_when_empty() {
        assert_eq!(format_filters_display(&ExtractedFilters::default()), None);
    }

    #[test]
    fn test_display_renders_full_state_name_with_code() {
        let filters = ExtractedFilters {
            state: Some("FL".into()),
            ..Default::default()
        };
        let display = format_filters_display(&filters).unwrap();
        assert!(display.contains("Florida"));
        assert!(display.contains("FL"));
    }

    #[test]
    fn test_display_joins_parts_with_separator() {
        let filters = ExtractedFilters {
            state: Some("FL".into()),
            jobtype: Some("Full-Time".into()),
            ..Default::default()
        };
        let display = format_filters_display(&filters).unwrap();
        assert_eq!(display, "State: Florida (FL) • Job type: Full-Time");
    }

    /// "RN jobs in Florida" with FL and Nursing loaded: only the state is
    /// detected, and it flows through expression and display unchanged.
    #[test]
    fn test_rn_jobs_in_florida_end_to_end() {
        let options = FilterOptions {
            states: vec!["FL".into()],
            categories: vec!["Nursing".into()],
            ..Default::default()
        };
        let filters = extract_filters("RN jobs in Florida", &options);
        assert_eq!(filters.state.as_deref(), Some("FL"));
        assert_eq!(filters.category, None);
        assert_eq!(build_filter_by(&filters).as_deref(), Some("state:=FL"));
        assert!(format_filters_display(&filters).unwrap().contains("FL"));
    }

    #[test]
    fn test_display_falls_back_to_code_for_unknown_state() {
        let filters = ExtractedFilters {
            state: Some("PR".into()),
            ..Default::default()
        };
        assert_eq!(format_filters_display(&filters).as_deref(), Some("State: PR"));
    }
}
