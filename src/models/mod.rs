pub mod insight;
mod pnl;

pub use insight::{Insight, ModelInfo, TokenInsightRequest, TokenInsightResponse, TokenMarketData, TokenSummary};
pub use pnl::{DailyPnl, PnlMeta, PnlQuery, PnlResponse, PnlSummary, MOCK_PNL_NOTE};
