//! Search orchestrator — turns one user message plus stored defaults into
//! exactly one conversational search call and normalizes the response.
//!
//! No retry here: each chat call is at-most-once. Retry policy lives only in
//! the model lifecycle path.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::filters::expression::{build_filter_by, format_filters_display};
use crate::filters::extractor::{extract_filters, ExtractedFilters};
use crate::filters::vocabulary::FilterOptions;
use crate::search_client::SearchClient;

/// Number of documents entering the AI's context when the caller does not
/// override it. Callers are responsible for clamping overrides to a sane
/// range; this layer does not coerce.
const DEFAULT_PER_PAGE: u64 = 100;

const FALLBACK_ANSWER: &str = "Sorry, I couldn't generate a response.";

/// Caller-supplied overrides, typically persisted UI settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatOptions {
    /// Override per_page (number of jobs in context).
    pub per_page: Option<u64>,
    /// Custom system prompt prepended to the user message as context.
    pub system_prompt: Option<String>,
    /// Override collection name.
    pub collection_name: Option<String>,
    /// Override conversation model id.
    pub model_id: Option<String>,
    /// Default filters from settings, applied only where extraction found
    /// nothing.
    pub default_filters: Option<ExtractedFilters>,
}

/// The exact outbound parameters this service constructed and transmitted,
/// surfaced for the debug panel. Never the raw backend response.
#[derive(Debug, Serialize)]
pub struct DebugTrace {
    pub search_params: Value,
    pub query_params: Value,
    pub effective_message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResult {
    pub answer: String,
    pub conversation_id: Option<String>,
    pub jobs_found: u64,
    pub hits: Vec<Value>,
    pub filters_applied: ExtractedFilters,
    pub filters_display: Option<String>,
    pub filter_by: Option<String>,
    pub debug: DebugTrace,
}

/// Fills facets the extractor left empty from the caller's defaults.
/// A detected value always wins over a default for the same facet.
pub fn merge_with_defaults(
    detected: ExtractedFilters,
    defaults: Option<&ExtractedFilters>,
) -> ExtractedFilters {
    let Some(defaults) = defaults else {
        return detected;
    };
    ExtractedFilters {
        state: detected.state.or_else(|| defaults.state.clone()),
        jobtype: detected.jobtype.or_else(|| defaults.jobtype.clone()),
        remotetype: detected.remotetype.or_else(|| defaults.remotetype.clone()),
        category: detected.category.or_else(|| defaults.category.clone()),
    }
}

/// Prepends the system prompt override to the user message as bracketed
/// context, when configured.
pub fn effective_message(message: &str, system_prompt: Option<&str>) -> String {
    match system_prompt {
        Some(prompt) if !prompt.is_empty() => format!("[Context: {prompt}]\n\n{message}"),
        _ => message.to_string(),
    }
}

/// Sends one natural-language message to the conversational search.
/// Auto-detects filters from the message and merges in settings defaults.
pub async fn job_search_chat(
    search: &SearchClient,
    options_snapshot: &FilterOptions,
    default_collection: &str,
    default_model_id: &str,
    message: &str,
    conversation_id: Option<&str>,
    options: &ChatOptions,
) -> Result<ChatResult, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let per_page = options.per_page.unwrap_or(DEFAULT_PER_PAGE);
    let collection = options
        .collection_name
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(default_collection);
    let model_id = options
        .model_id
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(default_model_id);

    // Detect filters from the message, fall back to settings defaults.
    let detected = extract_filters(message, options_snapshot);
    let filters = merge_with_defaults(detected, options.default_filters.as_ref());

    let filter_by = build_filter_by(&filters);
    let filters_display = format_filters_display(&filters);

    let effective = effective_message(message, options.system_prompt.as_deref());

    let mut query_params: Vec<(String, String)> = vec![
        ("q".to_string(), effective.clone()),
        ("conversation".to_string(), "true".to_string()),
        ("conversation_model_id".to_string(), model_id.to_string()),
    ];
    if let Some(id) = conversation_id {
        query_params.push(("conversation_id".to_string(), id.to_string()));
    }

    let mut search_params = json!({
        "collection": collection,
        "query_by": "embedding",
        "exclude_fields": "embedding",
        "prefix": "false",
        "per_page": per_page,
    });
    if let Some(filter_by) = &filter_by {
        search_params["filter_by"] = json!(filter_by);
    }

    debug!(
        "Chat search: collection={collection} model={model_id} filter_by={filter_by:?} \
         per_page={per_page}"
    );

    let response = search
        .multi_search(search_params.clone(), &query_params)
        .await?;

    let (answer, backend_conversation_id) = match response.conversation {
        Some(conversation) => (
            conversation
                .answer
                .unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
            conversation.conversation_id,
        ),
        None => (FALLBACK_ANSWER.to_string(), None),
    };

    let (jobs_found, hits) = match response.results.into_iter().next() {
        Some(result) => (result.found.unwrap_or(0), result.hits.unwrap_or_default()),
        None => (0, Vec::new()),
    };

    let query_params_trace = Value::Object(
        query_params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<_, _>>(),
    );

    Ok(ChatResult {
        answer,
        conversation_id: backend_conversation_id,
        jobs_found,
        hits,
        filters_applied: filters,
        filters_display,
        filter_by,
        debug: DebugTrace {
            search_params,
            query_params: query_params_trace,
            effective_message: effective,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(state: Option<&str>, jobtype: Option<&str>) -> ExtractedFilters {
        ExtractedFilters {
            state: state.map(String::from),
            jobtype: jobtype.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_defaults_fill_missing_facets() {
        let defaults = detected(Some("TX"), Some("Full-Time"));
        let merged = merge_with_defaults(ExtractedFilters::default(), Some(&defaults));
        assert_eq!(merged.state.as_deref(), Some("TX"));
        assert_eq!(merged.jobtype.as_deref(), Some("Full-Time"));
    }

    #[test]
    fn test_merge_detected_value_wins_over_default() {
        let defaults = detected(Some("TX"), None);
        let merged = merge_with_defaults(detected(Some("FL"), None), Some(&defaults));
        assert_eq!(merged.state.as_deref(), Some("FL"));
    }

    #[test]
    fn test_merge_is_per_facet_not_all_or_nothing() {
        let defaults = ExtractedFilters {
            state: Some("TX".into()),
            category: Some("Nursing".into()),
            ..Default::default()
        };
        let merged = merge_with_defaults(detected(Some("FL"), None), Some(&defaults));
        assert_eq!(merged.state.as_deref(), Some("FL"));
        assert_eq!(merged.category.as_deref(), Some("Nursing"));
    }

    #[test]
    fn test_merge_without_defaults_is_identity() {
        let merged = merge_with_defaults(detected(Some("FL"), None), None);
        assert_eq!(merged.state.as_deref(), Some("FL"));
        assert_eq!(merged.jobtype, None);
    }

    #[test]
    fn test_effective_message_prepends_bracketed_context() {
        let message = effective_message("RN jobs", Some("Only suggest full-time roles"));
        assert_eq!(
            message,
            "[Context: Only suggest full-time roles]\n\nRN jobs"
        );
    }

    #[test]
    fn test_effective_message_unchanged_without_prompt() {
        assert_eq!(effective_message("RN jobs", None), "RN jobs");
        assert_eq!(effective_message("RN jobs", Some("")), "RN jobs");
    }

    #[test]
    fn test_chat_options_deserialize_camel_case_settings() {
        let options: ChatOptions = serde_json::from_str(
            r#"{
                "perPage": 50,
                "systemPrompt": "Only suggest full-time roles",
                "collectionName": "jobs_v2",
                "modelId": "job-search-assistant",
                "defaultFilters": { "state": "FL" }
            }"#,
        )
        .unwrap();
        assert_eq!(options.per_page, Some(50));
        assert_eq!(
            options.default_filters.unwrap().state.as_deref(),
            Some("FL")
        );
    }

    #[test]
    fn test_chat_options_all_fields_optional() {
        let options: ChatOptions = serde_json::from_str("{}").unwrap();
        assert!(options.per_page.is_none());
        assert!(options.default_filters.is_none());
    }

    /// Empty message fails validation before any network call; the client
    /// here points nowhere and would fail differently if one were made.
    #[tokio::test]
    async fn test_empty_message_is_rejected_before_any_network_call() {
        let search = SearchClient::new("unreachable.invalid", "key".to_string());
        let err = job_search_chat(
            &search,
            &FilterOptions::default(),
            "jobs_v2",
            "job-search-assistant",
            "   ",
            None,
            &ChatOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
