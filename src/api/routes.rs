use axum::{
    Router,
    body::Bytes,
    extract::{Json, State},
    http::Method,
    routing::post,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::AppState;
use crate::api::handler::handle_event;
use crate::api::models::HttpEvent;
use crate::api::response::{self, ResponseEnvelope};
use crate::error::AppError;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/scrape", post(scrape_handler).options(scrape_handler))
        .route("/invoke", post(invoke_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn scrape_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> ResponseEnvelope {
    handle_event(&state, method.as_str(), Some(&body[..])).await
}

/// Lambda-style invocation: the event carries the method and body, and the
/// envelope itself is returned as the JSON payload. The event is decoded
/// here rather than by an extractor so that a bad event still gets an
/// envelope, whatever its content type.
async fn invoke_handler(State(state): State<AppState>, body: Bytes) -> Json<ResponseEnvelope> {
    let envelope = match serde_json::from_slice::<HttpEvent>(&body) {
        Ok(event) => handle_event(&state, &event.http_method, event.body_bytes()).await,
        Err(err) => {
            warn!(error = %err, "Rejected malformed event");
            response::error(&AppError::MalformedBody(err))
        }
    };
    Json(envelope)
}
