use serde::{Deserialize, Serialize};

/// Coarse market mood label returned by the AI provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInsightRequest {
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub reasoning: String,
    pub sentiment: Sentiment,
}

impl Insight {
    pub fn neutral(reasoning: impl Into<String>) -> Self {
        Self {
            reasoning: reasoning.into(),
            sentiment: Sentiment::Neutral,
        }
    }
}

/// Market figures in `vs_currency`. Key names keep the `_usd` suffix for
/// wire compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMarketData {
    pub vs_currency: String,
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub change_24h: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_data: TokenMarketData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInsightResponse {
    pub source: String,
    pub token: TokenSummary,
    pub insight: Insight,
    pub model: ModelInfo,
}
