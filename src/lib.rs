pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod scraper;

use std::sync::Arc;

use config::Config;
use engine::{Extractor, GraphClient};

/// Application state shared across handlers. Nothing in it is mutable; the
/// scrape template inside `config` is cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Arc<dyn Extractor>,
}

impl AppState {
    pub fn new(config: Config, extractor: Arc<dyn Extractor>) -> Self {
        AppState {
            config: Arc::new(config),
            extractor,
        }
    }

    /// State backed by the HTTP extraction engine named in `config`.
    pub fn with_graph_client(config: Config) -> Self {
        let client = GraphClient::new(&config.engine_url, config.engine_api_key.clone());
        Self::new(config, Arc::new(client))
    }
}

/// Installs the global tracing subscriber used by the binaries.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,llm_scrape=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
