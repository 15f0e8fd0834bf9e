use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use crate::external::market_data_provider::{
    CoinDetails, CoinMarketData, MarketDataError, MarketDataProvider,
};

pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MarketDataError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| MarketDataError::BadResponse(format!("invalid base url {}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("token-insight-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn coin_url(&self, token_id: &str) -> Result<Url, MarketDataError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketDataError::BadResponse(format!("base url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push("coins")
            .push(token_id);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct CoinGeckoCoin {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    market_data: Option<CoinGeckoMarketData>,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoMarketData {
    #[serde(default)]
    current_price: Option<HashMap<String, Option<f64>>>,
    #[serde(default)]
    market_cap: Option<HashMap<String, Option<f64>>>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
}

fn drop_nulls(values: Option<HashMap<String, Option<f64>>>) -> HashMap<String, f64> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(currency, value)| value.map(|v| (currency, v)))
        .collect()
}

impl From<CoinGeckoCoin> for CoinDetails {
    fn from(coin: CoinGeckoCoin) -> Self {
        CoinDetails {
            id: coin.id,
            symbol: coin.symbol,
            name: coin.name,
            market_data: coin.market_data.map(|m| CoinMarketData {
                current_price: drop_nulls(m.current_price),
                market_cap: drop_nulls(m.market_cap),
                price_change_percentage_24h: m.price_change_percentage_24h,
            }),
        }
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn source(&self) -> &'static str {
        "coingecko"
    }

    async fn fetch_coin(&self, token_id: &str) -> Result<CoinDetails, MarketDataError> {
        let url = self.coin_url(token_id)?;
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .query(&[
                ("localization", "false"),
                ("tickers", "false"),
                ("community_data", "false"),
                ("developer_data", "false"),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("CoinGecko request for {} failed: {}", token_id, e);
                MarketDataError::Network(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("CoinGecko returned {} for {}", status, token_id);
            return Err(MarketDataError::BadResponse(format!("HTTP {}: {}", status, body)));
        }

        let coin: CoinGeckoCoin = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        Ok(coin.into())
    }
}
