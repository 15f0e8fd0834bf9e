use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::info;

use crate::errors::AppError;
use crate::models::{DailyPnl, PnlMeta, PnlQuery, PnlResponse, PnlSummary, MOCK_PNL_NOTE};

/// Source of uniform draws for mock PnL generation.
pub trait RandomSource {
    /// Uniform sample in `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

pub struct StdRandomSource(StdRng);

impl StdRandomSource {
    pub fn from_os_rng() -> Self {
        Self(StdRng::from_os_rng())
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandomSource {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.0.random_range(low..=high)
    }
}

const REALIZED_RANGE: (f64, f64) = (-50.0, 100.0);
const UNREALIZED_RANGE: (f64, f64) = (-15.0, 30.0);
const FEES_RANGE: (f64, f64) = (-5.0, 0.0);
const FUNDING_RANGE: (f64, f64) = (-1.0, 1.0);

fn round_cents(value: f64) -> Decimal {
    let rounded = Decimal::from_f64(value).unwrap_or(Decimal::ZERO).round_dp(2);
    // Keep -0.00 from leaking into the output.
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

fn draw(rng: &mut dyn RandomSource, (low, high): (f64, f64)) -> Decimal {
    round_cents(rng.uniform(low, high))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    raw.trim()
        .parse::<NaiveDate>()
        .map_err(|e| AppError::Validation(format!("Invalid date input: '{}': {}", raw, e)))
}

/// Parses and validates an inclusive date range of at most `max_days` days.
pub fn parse_range(start: &str, end: &str, max_days: i64) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;

    if start_date > end_date {
        return Err(AppError::Validation(
            "Invalid date input: Start date must be before end date.".to_string(),
        ));
    }

    let days = (end_date - start_date).num_days() + 1;
    if days > max_days {
        return Err(AppError::Validation(format!(
            "Invalid date input: range spans {} days, maximum is {}",
            days, max_days
        )));
    }

    Ok((start_date, end_date))
}

pub fn generate_day(date: NaiveDate, rng: &mut dyn RandomSource) -> DailyPnl {
    let realized_pnl = draw(rng, REALIZED_RANGE);
    let unrealized_pnl = draw(rng, UNREALIZED_RANGE);
    let fees = draw(rng, FEES_RANGE);
    let funding = draw(rng, FUNDING_RANGE);

    DailyPnl {
        date,
        realized_pnl,
        unrealized_pnl,
        fees,
        funding,
        net_pnl: realized_pnl + unrealized_pnl + funding + fees,
    }
}

/// One entry per calendar day, `start` and `end` inclusive.
pub fn generate_daily(start: NaiveDate, end: NaiveDate, rng: &mut dyn RandomSource) -> Vec<DailyPnl> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| generate_day(date, rng))
        .collect()
}

pub fn summarize(daily: &[DailyPnl]) -> PnlSummary {
    let mut summary = daily.iter().fold(PnlSummary::default(), |mut acc, day| {
        acc.realized += day.realized_pnl;
        acc.unrealized += day.unrealized_pnl;
        acc.fees += day.fees;
        acc.funding += day.funding;
        acc.net += day.net_pnl;
        acc
    });

    summary.realized = summary.realized.round_dp(2);
    summary.unrealized = summary.unrealized.round_dp(2);
    summary.fees = summary.fees.round_dp(2);
    summary.funding = summary.funding.round_dp(2);
    summary.net = summary.net.round_dp(2);
    summary
}

pub fn generate_pnl_report(
    wallet: &str,
    query: &PnlQuery,
    max_days: i64,
    rng: &mut dyn RandomSource,
) -> Result<PnlResponse, AppError> {
    let (start, end) = parse_range(&query.start, &query.end, max_days)?;

    let daily = generate_daily(start, end, rng);
    let summary = summarize(&daily);
    info!("Generated {} mock PnL days for wallet {}", daily.len(), wallet);

    Ok(PnlResponse {
        wallet: wallet.to_string(),
        start: query.start.clone(),
        end: query.end.clone(),
        daily,
        summary,
        meta: PnlMeta {
            generated_at: Utc::now(),
            note: MOCK_PNL_NOTE.to_string(),
        },
    })
}
