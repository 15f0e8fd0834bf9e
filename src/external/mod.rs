pub mod coingecko;
pub mod market_data_provider;
