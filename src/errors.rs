use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::market_data_provider::MarketDataError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to fetch token data: {0}")]
    UpstreamFetch(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<MarketDataError> for AppError {
    fn from(value: MarketDataError) -> Self {
        match value {
            MarketDataError::MissingQuote { .. } => AppError::Validation(value.to_string()),
            other => AppError::UpstreamFetch(other.to_string()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        AppError::Validation(value.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        AppError::Validation(value.body_text())
    }
}

/// Failures talking to the chat-completion provider. These never reach the
/// client; the insight service folds them into a degraded insight.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider is not configured")]
    Disabled,
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
