use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{TokenInsightRequest, TokenInsightResponse};
use crate::services::insight_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:token_id/insight", post(get_token_insight))
}

/// POST /api/token/:token_id/insight
/// Market snapshot for a token plus a short AI-generated sentiment read.
pub async fn get_token_insight(
    Path(token_id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<TokenInsightRequest>, JsonRejection>,
) -> Result<Json<TokenInsightResponse>, AppError> {
    let Json(body) = payload?;
    info!("POST /api/token/{}/insight - vs_currency: {}", token_id, body.vs_currency);

    let response = insight_service::get_token_insight(
        state.market_data.as_ref(),
        state.llm.as_ref(),
        &token_id,
        &body,
    )
    .await
    .map_err(|e| {
        error!("Failed to build insight for {}: {}", token_id, e);
        e
    })?;

    Ok(Json(response))
}
