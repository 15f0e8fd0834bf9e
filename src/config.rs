use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Process-wide configuration, read once at startup and shared read-only
/// through `AppState`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub coingecko_base_url: String,
    pub market_data_timeout: Duration,
    pub llm: LlmConfig,
    pub pnl_max_range_days: i64,
}

/// Settings for the chat-completion provider used by the insight endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            coingecko_base_url: DEFAULT_COINGECKO_BASE_URL.to_string(),
            market_data_timeout: Duration::from_secs(10),
            llm: LlmConfig::default(),
            pnl_max_range_days: 366,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", raw))?,
            None => defaults.port,
        };

        let market_data_timeout = match lookup("MARKET_DATA_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .with_context(|| format!("Invalid MARKET_DATA_TIMEOUT_SECS value: {}", raw))?,
            ),
            None => defaults.market_data_timeout,
        };

        let llm_timeout = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .with_context(|| format!("Invalid LLM_TIMEOUT_SECS value: {}", raw))?,
            ),
            None => defaults.llm.timeout,
        };

        let pnl_max_range_days = match lookup("PNL_MAX_RANGE_DAYS") {
            Some(raw) => {
                let days = raw
                    .parse::<i64>()
                    .with_context(|| format!("Invalid PNL_MAX_RANGE_DAYS value: {}", raw))?;
                if days < 1 {
                    anyhow::bail!("PNL_MAX_RANGE_DAYS must be at least 1, got {}", days);
                }
                days
            }
            None => defaults.pnl_max_range_days,
        };

        // An empty key is treated the same as a missing one.
        let api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            coingecko_base_url: lookup("COINGECKO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.coingecko_base_url),
            market_data_timeout,
            llm: LlmConfig {
                provider: lookup("AI_PROVIDER").unwrap_or(defaults.llm.provider),
                api_key,
                model: lookup("AI_MODEL").unwrap_or(defaults.llm.model),
                base_url: lookup("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.llm.base_url),
                timeout: llm_timeout,
            },
            pnl_max_range_days,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}
