use std::sync::Arc;

use crate::config::AppConfig;
use crate::external::market_data_provider::MarketDataProvider;
use crate::services::llm_service::LlmService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub llm: Arc<LlmService>,
}
