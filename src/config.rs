use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{AppError, Result};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub format: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub chunk_size: u32,
    pub chunk_overlap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingsConfig {
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapingConfig {
    pub max_depth: u32,
    pub max_pages: u32,
    /// Seconds. Forwarded to the extraction engine, which enforces it.
    pub timeout: u64,
}

/// Settings handed to the extraction engine for a single request.
///
/// The process keeps one immutable template; every request works on a
/// clone produced by [`ScrapeConfig::with_overrides`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeConfig {
    pub llm: LlmConfig,
    pub embeddings: EmbeddingsConfig,
    pub scraping: ScrapingConfig,
}

/// Built once per process; requests only ever see clones of it.
static GRAPH_CONFIG: Lazy<ScrapeConfig> = Lazy::new(|| ScrapeConfig {
    llm: LlmConfig {
        model: "ollama/mistral".to_string(),
        temperature: 0.0,
        format: "json".to_string(),
        base_url: DEFAULT_OLLAMA_URL.to_string(),
        max_tokens: 1024,
        chunk_size: 512,
        chunk_overlap: 50,
    },
    embeddings: EmbeddingsConfig {
        model: "ollama/nomic-embed-text".to_string(),
        base_url: DEFAULT_OLLAMA_URL.to_string(),
    },
    scraping: ScrapingConfig {
        max_depth: 2,
        max_pages: 10,
        timeout: 30,
    },
});

impl Default for ScrapeConfig {
    fn default() -> Self {
        GRAPH_CONFIG.clone()
    }
}

/// Per-request limits that may replace the template's scraping limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeOverrides {
    pub max_depth: Option<u32>,
    pub max_pages: Option<u32>,
}

impl ScrapeConfig {
    pub fn with_overrides(&self, overrides: &ScrapeOverrides) -> ScrapeConfig {
        let mut config = self.clone();
        if let Some(max_depth) = overrides.max_depth {
            config.scraping.max_depth = max_depth;
        }
        if let Some(max_pages) = overrides.max_pages {
            config.scraping.max_pages = max_pages;
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub engine_url: String,
    pub engine_api_key: Option<String>,
    pub template: ScrapeConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let engine_url = lookup("EXTRACTION_ENGINE_URL")
            .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !engine_url.starts_with("http://") && !engine_url.starts_with("https://") {
            return Err(AppError::ConfigError(format!(
                "Invalid extraction engine URL: {}",
                engine_url
            )));
        }
        let engine_api_key = lookup("EXTRACTION_ENGINE_API_KEY").filter(|key| !key.is_empty());

        let mut template = ScrapeConfig::default();
        if let Some(base_url) = lookup("OLLAMA_BASE_URL") {
            template.llm.base_url = base_url.clone();
            template.embeddings.base_url = base_url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            template.llm.model = model;
        }
        if let Some(model) = lookup("EMBEDDINGS_MODEL") {
            template.embeddings.model = model;
        }

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            engine_url,
            engine_api_key,
            template,
        })
    }
}
