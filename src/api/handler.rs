use tracing::{error, info, warn};

use crate::AppState;
use crate::api::models::is_preflight;
use crate::api::response::{self, ResponseEnvelope};
use crate::api::validate::{decode_body, validate_input};
use crate::error::Result;
use crate::scraper::{self, ScrapeOutcome};

/// Handles one inbound event and always produces an envelope.
///
/// `OPTIONS` short-circuits with the preflight acknowledgement. Otherwise the
/// body is decoded, validated and dispatched; decode and validation failures
/// become 400s, dispatch failures 500s.
pub async fn handle_event(state: &AppState, method: &str, body: Option<&[u8]>) -> ResponseEnvelope {
    info!(method, body_len = body.map_or(0, <[u8]>::len), "Received event");

    if is_preflight(method) {
        return response::cors_preflight();
    }

    match process(state, body).await {
        Ok(outcome) => {
            info!(url = %outcome.metadata.url, "Request completed successfully");
            response::success(&outcome)
        }
        Err(err) if err.status_code().is_client_error() => {
            warn!(error = %err, "Rejected request");
            response::error(&err)
        }
        Err(err) => {
            error!(error = ?err, "Error processing request");
            response::error(&err)
        }
    }
}

async fn process(state: &AppState, body: Option<&[u8]>) -> Result<ScrapeOutcome> {
    let body = decode_body(body)?;
    let input = validate_input(&body)?;
    scraper::dispatch(state.extractor.clone(), &state.config.template, input).await
}
