use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Coin record as returned by a market-data provider, with null quotes
/// already dropped.
#[derive(Debug, Clone)]
pub struct CoinDetails {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_data: Option<CoinMarketData>,
}

#[derive(Debug, Clone, Default)]
pub struct CoinMarketData {
    pub current_price: HashMap<String, f64>,
    pub market_cap: HashMap<String, f64>,
    pub price_change_percentage_24h: Option<f64>,
}

/// Market figures for one quote currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketQuote {
    pub price: f64,
    pub market_cap: f64,
    pub change_24h: Option<f64>,
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("Currency '{currency}' not quoted for token '{token}'")]
    MissingQuote { token: String, currency: String },
}

impl CoinDetails {
    /// Price and market cap are required for `currency`; the 24h change may be absent.
    pub fn quote(&self, currency: &str) -> Result<MarketQuote, MarketDataError> {
        let missing = || MarketDataError::MissingQuote {
            token: self.id.clone(),
            currency: currency.to_string(),
        };

        let market = self.market_data.as_ref().ok_or_else(missing)?;
        let price = market.current_price.get(currency).copied().ok_or_else(missing)?;
        let market_cap = market.market_cap.get(currency).copied().ok_or_else(missing)?;

        Ok(MarketQuote {
            price,
            market_cap,
            change_24h: market.price_change_percentage_24h,
        })
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short tag identifying the provider in responses (e.g. "coingecko").
    fn source(&self) -> &'static str;

    async fn fetch_coin(&self, token_id: &str) -> Result<CoinDetails, MarketDataError>;
}
