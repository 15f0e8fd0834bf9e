mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::coingecko::CoinGeckoProvider;
use crate::logging::{init_logging, LoggingConfig};
use crate::services::llm_service::LlmService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let market_data = CoinGeckoProvider::new(&config.coingecko_base_url, config.market_data_timeout)
        .context("Failed to create CoinGecko client")?;
    tracing::info!("📊 Market data source: {}", config.coingecko_base_url);

    let llm = LlmService::new(config.llm.clone());

    let addr = config.socket_addr()?;
    let state = AppState {
        config: Arc::new(config),
        market_data: Arc::new(market_data),
        llm: Arc::new(llm),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Token Insight & PnL API running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
