use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;
use crate::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid JSON in request body")]
    MalformedBody(#[source] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Unhandled(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_)
            | AppError::TypeMismatch { .. }
            | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::Engine(_) | AppError::Unhandled(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text placed in the `error` field of the response body.
    pub fn response_message(&self) -> String {
        if self.status_code().is_server_error() {
            format!("Internal server error: {}", self)
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::error(&self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
