use crate::config::Config;
use crate::filters::vocabulary::FilterOptionsCache;
use crate::search_client::SearchClient;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchClient,
    /// Process-wide filter vocabulary cache. Replaced wholesale by the
    /// initialize endpoint; read by extraction and the filters endpoint.
    pub filter_options: FilterOptionsCache,
    pub config: Config,
}
