use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails fast at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Typesense cluster hostname (no scheme, no port).
    pub typesense_host: String,
    /// Admin API key for the Typesense cluster.
    pub typesense_api_key: String,
    /// OpenAI key embedded in the conversation model config on create.
    pub openai_api_key: String,
    /// Default collection searched when the caller supplies no override.
    pub collection_name: String,
    /// Default conversation model id used by chat and the prompt admin API.
    pub conversation_model_id: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            typesense_host: require_env("TYPESENSE_HOST")?,
            typesense_api_key: require_env("TYPESENSE_API_KEY")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            collection_name: std::env::var("COLLECTION_NAME")
                .unwrap_or_else(|_| "jobs_v2".to_string()),
            conversation_model_id: std::env::var("CONVERSATION_MODEL_ID")
                .unwrap_or_else(|_| "job-search-assistant".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
