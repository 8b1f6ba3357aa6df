//! Manual smoke test: runs one fixed scrape through the dispatcher and
//! prints the engine's answer.

use std::process::ExitCode;

use tracing::{error, info};

use llm_scrape::{
    AppState,
    api::validate::ValidatedInput,
    config::{Config, ScrapeOverrides},
    init_tracing,
    scraper::{self, DEFAULT_PROMPT},
};

const SOURCE_URL: &str = "https://dev.to/t/webdev";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "An error occurred");
            return ExitCode::FAILURE;
        }
    };
    let state = AppState::with_graph_client(config);

    let input = ValidatedInput {
        url: SOURCE_URL.to_string(),
        prompt: Some(DEFAULT_PROMPT.to_string()),
        overrides: ScrapeOverrides::default(),
    };

    match scraper::dispatch(state.extractor.clone(), &state.config.template, input).await {
        Ok(outcome) if !scraper::has_content(&outcome.data) => {
            error!(url = SOURCE_URL, "Scraping failed to produce results");
            ExitCode::FAILURE
        }
        Ok(outcome) => {
            info!("Scraping completed successfully");
            match serde_json::to_string_pretty(&outcome.data) {
                Ok(text) => println!("{}", text),
                Err(_) => println!("{}", outcome.data),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Scraping failed to produce results");
            ExitCode::FAILURE
        }
    }
}
