use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/test", post(test_post))
}

async fn health() -> Json<Value> {
    info!("GET / - Health check");
    Json(json!({ "status": "✅ Server running" }))
}

async fn test_post() -> Json<Value> {
    info!("POST /test");
    Json(json!({ "message": "POST route working fine." }))
}
