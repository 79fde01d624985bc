mod chat;
mod config;
mod errors;
mod filters;
mod model_admin;
mod routes;
mod search_client;
mod state;

use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::filters::vocabulary::{load_filter_options, FilterOptionsCache};
use crate::routes::build_router;
use crate::search_client::SearchClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job search API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the Typesense client
    let search = SearchClient::new(&config.typesense_host, config.typesense_api_key.clone());
    info!("Search client initialized (host: {})", config.typesense_host);

    // Eagerly warm the filter vocabulary; the cache stays empty on failure
    // until a later initialize call succeeds.
    let filter_options = FilterOptionsCache::default();
    match load_filter_options(&search, &config.collection_name).await {
        Ok(options) => filter_options.replace(options),
        Err(e) => warn!("Startup filter load failed (initialize later): {e}"),
    }

    let state = AppState {
        search,
        filter_options,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
