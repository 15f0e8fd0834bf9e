use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{PnlQuery, PnlResponse};
use crate::services::pnl_service::{self, StdRandomSource};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:wallet/pnl", get(get_wallet_pnl))
}

/// GET /api/hyperliquid/:wallet/pnl?start=YYYY-MM-DD&end=YYYY-MM-DD
/// Mock daily PnL series for a wallet.
pub async fn get_wallet_pnl(
    Path(wallet): Path<String>,
    params: Result<Query<PnlQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<PnlResponse>, AppError> {
    let Query(params) = params?;
    info!("GET /api/hyperliquid/{}/pnl - {} to {}", wallet, params.start, params.end);

    let mut rng = StdRandomSource::from_os_rng();
    let report = pnl_service::generate_pnl_report(
        &wallet,
        &params,
        state.config.pnl_max_range_days,
        &mut rng,
    )
    .map_err(|e| {
        warn!("Rejected PnL request for {}: {}", wallet, e);
        e
    })?;

    Ok(Json(report))
}
