use std::collections::BTreeMap;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::scraper::{ScrapeMetadata, ScrapeOutcome};

/// Headers attached to every response, preflight included.
pub const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

/// Transport wrapper returned for every request, in the API Gateway proxy
/// shape: `{statusCode, headers, body}` where `body` is JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: String,
}

#[derive(Serialize)]
struct SuccessBody<'a> {
    status: &'static str,
    data: &'a Value,
    metadata: &'a ScrapeMetadata,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub fn format_response<T: Serialize>(status: StatusCode, body: &T) -> ResponseEnvelope {
    let body = serde_json::to_string(body).unwrap_or_else(|err| {
        json!({ "error": format!("Failed to serialize response: {}", err) }).to_string()
    });

    ResponseEnvelope {
        status_code: status.as_u16(),
        headers: RESPONSE_HEADERS.into_iter().collect(),
        body,
    }
}

pub fn cors_preflight() -> ResponseEnvelope {
    format_response(StatusCode::OK, &json!({ "message": "CORS enabled" }))
}

pub fn success(outcome: &ScrapeOutcome) -> ResponseEnvelope {
    format_response(
        StatusCode::OK,
        &SuccessBody {
            status: "success",
            data: &outcome.data,
            metadata: &outcome.metadata,
        },
    )
}

pub fn error(err: &AppError) -> ResponseEnvelope {
    format_response(
        err.status_code(),
        &ErrorBody {
            error: err.response_message(),
        },
    )
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) =
                (HeaderName::try_from(name), HeaderValue::from_str(value))
            {
                headers.insert(name, value);
            }
        }

        response
    }
}
