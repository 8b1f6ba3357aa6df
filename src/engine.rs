//! Extraction engine seam.
//!
//! The engine fetches a page and answers a prompt about it with an LLM and
//! an embeddings model. This crate only ever talks to it through
//! [`Extractor`]; [`GraphClient`] is the implementation used in production.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::config::ScrapeConfig;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("request to extraction engine failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("extraction engine returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid response from extraction engine: {0}")]
    InvalidResponse(String),

    #[error("extraction failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    async fn extract(
        &self,
        url: &str,
        prompt: &str,
        config: &ScrapeConfig,
    ) -> Result<Value, EngineError>;
}

#[derive(Serialize)]
struct GraphRequest<'a> {
    prompt: &'a str,
    source: &'a str,
    config: &'a ScrapeConfig,
}

/// Client for a smart-scraper graph service reachable over HTTP.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GraphClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        // No request timeout here: `scraping.timeout` is enforced by the engine.
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_default();

        GraphClient {
            client,
            endpoint: format!("{}/v1/smartscraper", base_url.trim_end_matches('/')),
            api_key,
        }
    }
}

#[async_trait]
impl Extractor for GraphClient {
    fn name(&self) -> &'static str {
        "smart_scraper_graph"
    }

    async fn extract(
        &self,
        url: &str,
        prompt: &str,
        config: &ScrapeConfig,
    ) -> Result<Value, EngineError> {
        let body = GraphRequest {
            prompt,
            source: url,
            config,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            return Err(EngineError::Status {
                status,
                message: error_message(&text),
            });
        }

        let mut json: Value = serde_json::from_str(&text)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
        match json.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Ok(json),
        }
    }
}

/// Pulls a readable message out of an engine error body.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = parsed.as_ref().and_then(|json| {
        ["error", "detail"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str))
    });

    match field {
        Some(message) => message.to_string(),
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}
