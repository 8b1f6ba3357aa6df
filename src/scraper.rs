use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::api::validate::ValidatedInput;
use crate::config::ScrapeConfig;
use crate::engine::Extractor;
use crate::error::{AppError, Result};

pub const DEFAULT_PROMPT: &str = "What is this about?";

/// A fully resolved scrape: the request's own copy of the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRequest {
    pub url: String,
    pub prompt: String,
    pub config: ScrapeConfig,
}

impl ScrapeRequest {
    pub fn new(template: &ScrapeConfig, input: ValidatedInput) -> Self {
        ScrapeRequest {
            url: input.url,
            prompt: input.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            config: template.with_overrides(&input.overrides),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeMetadata {
    pub url: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeOutcome {
    pub data: Value,
    pub metadata: ScrapeMetadata,
}

pub struct SmartScraper {
    extractor: Arc<dyn Extractor>,
    request: ScrapeRequest,
}

impl SmartScraper {
    pub fn new(extractor: Arc<dyn Extractor>, request: ScrapeRequest) -> Self {
        SmartScraper { extractor, request }
    }

    /// Runs the extraction on its own task so that it completes even if the
    /// caller goes away, and so a panicking engine only fails this request.
    pub async fn run(self) -> Result<ScrapeOutcome> {
        let SmartScraper { extractor, request } = self;
        info!(
            url = %request.url,
            engine = extractor.name(),
            max_depth = request.config.scraping.max_depth,
            max_pages = request.config.scraping.max_pages,
            "Starting scraping"
        );
        let start = Instant::now();

        let task = {
            let request = request.clone();
            tokio::spawn(async move {
                extractor
                    .extract(&request.url, &request.prompt, &request.config)
                    .await
            })
        };

        let data = match task.await {
            Ok(Ok(data)) => data,
            Ok(Err(err)) => {
                error!(url = %request.url, error = %err, "Error during scraping");
                return Err(AppError::Engine(err));
            }
            Err(join_err) => {
                error!(url = %request.url, error = %join_err, "Scraping task aborted");
                return Err(AppError::Unhandled(format!(
                    "scraping task failed: {}",
                    join_err
                )));
            }
        };

        info!(url = %request.url, elapsed = ?start.elapsed(), "Scraping completed");
        Ok(ScrapeOutcome {
            data,
            metadata: ScrapeMetadata {
                url: request.url,
                prompt: request.prompt,
            },
        })
    }
}

pub async fn dispatch(
    extractor: Arc<dyn Extractor>,
    template: &ScrapeConfig,
    input: ValidatedInput,
) -> Result<ScrapeOutcome> {
    let request = ScrapeRequest::new(template, input);
    SmartScraper::new(extractor, request).run().await
}

/// False for results that carry nothing: `null`, `false`, zero, and empty
/// strings, arrays or objects.
pub fn has_content(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Splits text into fixed-width chunks of `chunk_size` characters.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / chunk_size + 1);
    let mut rest = text;

    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(chunk_size)
            .map_or(rest.len(), |(idx, _)| idx);
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }

    chunks
}
