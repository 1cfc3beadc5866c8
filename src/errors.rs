use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = |msg: String| Json(json!({ "error": msg }));

        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, body(msg)).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, body(msg)).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, body("Rate limited".to_string())).into_response()
            }
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, body(msg)).into_response(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<SeriesError> for AppError {
    fn from(value: SeriesError) -> Self {
        AppError::External(value.to_string())
    }
}

/// Failures from the text-completion provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM features are disabled")]
    Disabled,
    #[error("missing API key")]
    MissingApiKey,
    #[error("request timed out")]
    Timeout,
    #[error("rate limited")]
    RateLimited,
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("HTTP {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Timeout | LlmError::RateLimited | LlmError::NetworkError(_)
        ) || matches!(self, LlmError::ApiError { status, .. } if *status >= 500)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("price series timestamps must be strictly increasing (violated at index {index})")]
    NotIncreasing { index: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}
