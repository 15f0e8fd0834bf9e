use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MOCK_PNL_NOTE: &str = "Mock data for testing.";

#[derive(Debug, Clone, Deserialize)]
pub struct PnlQuery {
    pub start: String,
    pub end: String,
}

/// One generated day. `net_pnl` is always the exact sum of the other four.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPnl {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub realized_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unrealized_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fees: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub funding: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_pnl: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PnlSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub realized: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unrealized: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fees: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub funding: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlMeta {
    pub generated_at: DateTime<Utc>,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlResponse {
    pub wallet: String,
    pub start: String,
    pub end: String,
    pub daily: Vec<DailyPnl>,
    pub summary: PnlSummary,
    pub meta: PnlMeta,
}
