use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::market_data_provider::{MarketDataProvider, MarketQuote};
use crate::models::{Insight, TokenInsightRequest, TokenInsightResponse, TokenMarketData, TokenSummary};
use crate::services::llm_service::LlmService;

pub const AI_UNAVAILABLE_REASONING: &str = "AI key not set or API unavailable.";

/// Free-text completions are cut to this many characters.
const FREE_TEXT_LIMIT: usize = 200;

pub fn build_prompt(name: &str, symbol: &str, currency: &str, quote: &MarketQuote) -> String {
    let change = quote
        .change_24h
        .map(|c| format!("{}%", c))
        .unwrap_or_else(|| "n/a".to_string());
    let currency = currency.to_uppercase();

    format!(
        "Analyze {name} ({symbol}):\n\
         - Price: {price} {currency}\n\
         - Market Cap: {cap} {currency}\n\
         - 24h Change: {change}\n\
         \n\
         Give a short two-line insight and a sentiment label (Bullish/Bearish/Neutral).\n\
         Respond in JSON:\n\
         {{\n  \"reasoning\": \"...\",\n  \"sentiment\": \"Bullish|Bearish|Neutral\"\n}}",
        name = name,
        symbol = symbol.to_uppercase(),
        price = quote.price,
        cap = quote.market_cap,
        currency = currency,
        change = change,
    )
}

/// Interprets a completion. Text starting with `{` must parse as an
/// `Insight`; anything else becomes a truncated Neutral reasoning.
pub fn parse_completion(content: &str) -> Result<Insight, serde_json::Error> {
    if content.trim_start().starts_with('{') {
        return serde_json::from_str::<Insight>(content);
    }

    Ok(Insight::neutral(content.chars().take(FREE_TEXT_LIMIT).collect::<String>()))
}

/// Never fails: provider and parse errors degrade to a Neutral insight.
pub async fn generate_insight(llm: &LlmService, prompt: String) -> Insight {
    if !llm.is_enabled() {
        return Insight::neutral(AI_UNAVAILABLE_REASONING);
    }

    let outcome = match llm.generate_completion(prompt).await {
        Ok(content) => parse_completion(&content).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    outcome.unwrap_or_else(|message| {
        warn!("AI insight degraded: {}", message);
        Insight::neutral(format!("AI error: {}", message))
    })
}

pub async fn get_token_insight(
    market_data: &dyn MarketDataProvider,
    llm: &LlmService,
    token_id: &str,
    request: &TokenInsightRequest,
) -> Result<TokenInsightResponse, AppError> {
    let currency = request.vs_currency.trim().to_lowercase();
    if currency.is_empty() {
        return Err(AppError::Validation("vs_currency must not be empty".to_string()));
    }

    let coin = market_data.fetch_coin(token_id).await?;
    let quote = coin.quote(&currency)?;
    info!("Fetched {} ({}) quote in {}: {}", coin.name, coin.symbol, currency, quote.price);

    let prompt = build_prompt(&coin.name, &coin.symbol, &currency, &quote);
    let insight = generate_insight(llm, prompt).await;

    Ok(TokenInsightResponse {
        source: market_data.source().to_string(),
        token: TokenSummary {
            id: coin.id,
            symbol: coin.symbol,
            name: coin.name,
            market_data: TokenMarketData {
                vs_currency: currency,
                price_usd: quote.price,
                market_cap_usd: quote.market_cap,
                change_24h: quote.change_24h,
            },
        },
        insight,
        model: llm.model_info(),
    })
}
