//! Search client — the single point of entry for all Typesense API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Typesense API directly.
//! All search and model-management traffic MUST go through this module.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

/// Default bound on every outbound call. On expiry the in-flight request is
/// cancelled and the operation fails with a timeout instead of hanging.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Model creation carries the full system prompt and can be slow to process
/// server-side, so it gets a longer per-request bound. Tunable policy.
pub const MODEL_CREATE_TIMEOUT: Duration = Duration::from_secs(90);

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout(e.to_string())
        } else {
            SearchError::Http(e)
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Http(e) => AppError::Upstream {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                body: e.to_string(),
            },
            SearchError::Timeout(msg) => AppError::Timeout(msg),
            SearchError::Api { status, body } => AppError::Upstream { status, body },
            SearchError::Parse(e) => AppError::Parse(e.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Response envelope for `/multi_search`, both the faceting and the
/// conversational variant. Fields the backend omits default to empty.
#[derive(Debug, Deserialize)]
pub struct MultiSearchResponse {
    pub conversation: Option<ConversationEnvelope>,
    #[serde(default)]
    pub results: Vec<SearchResultEnvelope>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationEnvelope {
    pub answer: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultEnvelope {
    pub found: Option<u64>,
    pub hits: Option<Vec<Value>>,
    #[serde(default)]
    pub facet_counts: Vec<FacetCounts>,
}

#[derive(Debug, Deserialize)]
pub struct FacetCounts {
    pub field_name: String,
    #[serde(default)]
    pub counts: Vec<FacetCount>,
}

#[derive(Debug, Deserialize)]
pub struct FacetCount {
    pub value: String,
}

/// A conversation model as stored in the backend. There is no durable local
/// copy; every read re-fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationModel {
    pub id: String,
    pub model_name: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub max_bytes: u64,
    pub history_collection: Option<String>,
    pub ttl: Option<u64>,
}

/// Full configuration sent on model create. The backend does not support
/// in-place updates, so this is always a complete object.
#[derive(Debug, Serialize)]
pub struct ModelCreatePayload<'a> {
    pub id: &'a str,
    pub model_name: &'a str,
    pub api_key: &'a str,
    pub system_prompt: &'a str,
    pub max_bytes: u64,
    pub history_collection: &'a str,
    pub ttl: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single Typesense client used by all services.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SearchClient {
    pub fn new(host: &str, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: format!("https://{host}:443"),
            api_key,
        }
    }

    /// Runs one multi_search with a single search block. Extra query
    /// parameters carry the conversational settings when present.
    pub async fn multi_search(
        &self,
        search: Value,
        query_params: &[(String, String)],
    ) -> Result<MultiSearchResponse, SearchError> {
        let url = format!("{}/multi_search", self.base_url);
        debug!("POST {url} params={query_params:?}");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query_params)
            .json(&json!({ "searches": [search] }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches a conversation model by id. 404 maps to `None`.
    pub async fn get_model(&self, id: &str) -> Result<Option<ConversationModel>, SearchError> {
        let url = format!("{}/conversations/models/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Deletes a conversation model. Idempotent: a 404 means the model was
    /// already absent and is treated as success (returns `false`).
    pub async fn delete_model(&self, id: &str) -> Result<bool, SearchError> {
        let url = format!("{}/conversations/models/{id}", self.base_url);
        let response = self
            .client
            .delete(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(false);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(true)
    }

    /// Creates a conversation model. Uses the extended timeout since large
    /// prompt payloads make backend processing slow.
    pub async fn create_model(
        &self,
        payload: &ModelCreatePayload<'_>,
    ) -> Result<ConversationModel, SearchError> {
        let url = format!("{}/conversations/models", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(MODEL_CREATE_TIMEOUT)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
