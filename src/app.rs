use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{health, hyperliquid, token};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(health::router())
        .nest("/api/token", token::router())
        .nest("/api/hyperliquid", hyperliquid::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::{AppConfig, LlmConfig};
    use crate::errors::LlmError;
    use crate::external::coingecko::CoinGeckoProvider;
    use crate::external::market_data_provider::{
        CoinDetails, CoinMarketData, MarketDataError, MarketDataProvider,
    };
    use crate::services::insight_service::AI_UNAVAILABLE_REASONING;
    use crate::services::llm_service::{LlmProvider, LlmService};
    use crate::test_support::serve_canned;

    struct FixedMarket;

    #[async_trait]
    impl MarketDataProvider for FixedMarket {
        fn source(&self) -> &'static str {
            "coingecko"
        }

        async fn fetch_coin(&self, token_id: &str) -> Result<CoinDetails, MarketDataError> {
            Ok(CoinDetails {
                id: token_id.to_string(),
                symbol: "btc".to_string(),
                name: "Bitcoin".to_string(),
                market_data: Some(CoinMarketData {
                    current_price: HashMap::from([("usd".to_string(), 64000.0)]),
                    market_cap: HashMap::from([("usd".to_string(), 1.26e12)]),
                    price_change_percentage_24h: Some(1.75),
                }),
            })
        }
    }

    struct DownMarket;

    #[async_trait]
    impl MarketDataProvider for DownMarket {
        fn source(&self) -> &'static str {
            "coingecko"
        }

        async fn fetch_coin(&self, _token_id: &str) -> Result<CoinDetails, MarketDataError> {
            Err(MarketDataError::Network("simulated connection refused".to_string()))
        }
    }

    struct BullishLlm;

    #[async_trait]
    impl LlmProvider for BullishLlm {
        async fn generate_completion(&self, _prompt: String) -> Result<String, LlmError> {
            Ok(r#"{"reasoning": "Price is climbing.\nVolume confirms.", "sentiment": "Bullish"}"#.to_string())
        }
    }

    fn app_with(market: Arc<dyn MarketDataProvider>, llm: LlmService) -> Router {
        create_app(AppState {
            config: Arc::new(AppConfig::default()),
            market_data: market,
            llm: Arc::new(llm),
        })
    }

    fn default_app() -> Router {
        app_with(Arc::new(FixedMarket), LlmService::new(LlmConfig::default()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(default_app(), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "✅ Server running");
    }

    #[tokio::test]
    async fn test_post_test_route() {
        let request = Request::builder().method(Method::POST).uri("/test").body(Body::empty()).unwrap();
        let (status, body) = send(default_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "POST route working fine.");
    }

    #[tokio::test]
    async fn test_pnl_three_days() {
        let (status, body) = send(default_app(), get("/api/hyperliquid/0xabc/pnl?start=2024-01-01&end=2024-01-03")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wallet"], "0xabc");

        let daily = body["daily"].as_array().unwrap();
        let dates: Vec<&str> = daily.iter().map(|d| d["date"].as_str().unwrap()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);

        for (field, key) in [
            ("realized_pnl", "realized"),
            ("unrealized_pnl", "unrealized"),
            ("fees", "fees"),
            ("funding", "funding"),
            ("net_pnl", "net"),
        ] {
            let sum: f64 = daily.iter().map(|d| d[field].as_f64().unwrap()).sum();
            let reported = body["summary"][key].as_f64().unwrap();
            assert!((sum - reported).abs() < 1e-6, "{} summary mismatch", key);
        }

        for day in daily {
            assert!(day["fees"].as_f64().unwrap() <= 0.0);
        }
        assert_eq!(body["meta"]["note"], "Mock data for testing.");
        assert!(body["meta"]["generated_at"].is_string());
    }

    #[tokio::test]
    async fn test_pnl_start_after_end() {
        let (status, body) = send(default_app(), get("/api/hyperliquid/0xabc/pnl?start=2024-01-05&end=2024-01-01")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Start date must be before end date"));
    }

    #[tokio::test]
    async fn test_pnl_bad_date() {
        let (status, body) = send(default_app(), get("/api/hyperliquid/0xabc/pnl?start=01/02/2024&end=2024-01-03")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid date input"));
    }

    #[tokio::test]
    async fn test_pnl_range_over_cap() {
        let (status, _) = send(default_app(), get("/api/hyperliquid/0xabc/pnl?start=2020-01-01&end=2024-01-01")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pnl_missing_query() {
        let (status, body) = send(default_app(), get("/api/hyperliquid/0xabc/pnl?start=2024-01-01")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("end"));
    }

    #[tokio::test]
    async fn test_insight_without_ai_key() {
        let (status, body) = send(default_app(), post_json("/api/token/bitcoin/insight", r#"{"vs_currency":"usd"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "coingecko");
        assert_eq!(body["token"]["id"], "bitcoin");
        assert_eq!(body["token"]["market_data"]["vs_currency"], "usd");
        assert_eq!(body["token"]["market_data"]["price_usd"], 64000.0);
        assert_eq!(body["token"]["market_data"]["change_24h"], 1.75);
        assert_eq!(body["insight"]["sentiment"], "Neutral");
        assert_eq!(body["insight"]["reasoning"], AI_UNAVAILABLE_REASONING);
        assert_eq!(body["model"]["provider"], "openai");
        assert_eq!(body["model"]["name"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_insight_defaults_currency() {
        let (status, body) = send(default_app(), post_json("/api/token/bitcoin/insight", "{}")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"]["market_data"]["market_cap_usd"].is_number());
    }

    #[tokio::test]
    async fn test_insight_with_ai() {
        let llm = LlmService::with_provider(LlmConfig::default(), Arc::new(BullishLlm));
        let app = app_with(Arc::new(FixedMarket), llm);

        let (status, body) = send(app, post_json("/api/token/bitcoin/insight", r#"{"vs_currency":"usd"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["insight"]["sentiment"], "Bullish");
        assert_eq!(body["insight"]["reasoning"], "Price is climbing.\nVolume confirms.");
    }

    #[tokio::test]
    async fn test_insight_upstream_failure() {
        let app = app_with(Arc::new(DownMarket), LlmService::new(LlmConfig::default()));

        let (status, body) = send(app, post_json("/api/token/bitcoin/insight", r#"{"vs_currency":"usd"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Failed to fetch token data"));
        assert!(detail.contains("simulated connection refused"));
    }

    #[tokio::test]
    async fn test_insight_unquoted_currency() {
        let (status, body) = send(default_app(), post_json("/api/token/bitcoin/insight", r#"{"vs_currency":"xyz"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("xyz"));
    }

    #[tokio::test]
    async fn test_insight_malformed_body() {
        let (status, body) = send(default_app(), post_json("/api/token/bitcoin/insight", r#"{"vs_currency":"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_insight_wrong_field_type() {
        let (status, body) = send(default_app(), post_json("/api/token/bitcoin/insight", r#"{"vs_currency":42}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("vs_currency"));
    }

    fn coingecko_app(base: &str) -> Router {
        let provider = CoinGeckoProvider::new(base, Duration::from_secs(5)).unwrap();
        app_with(Arc::new(provider), LlmService::new(LlmConfig::default()))
    }

    #[tokio::test]
    async fn test_insight_upstream_error_status() {
        let base = serve_canned("503 Service Unavailable", r#"{"error":"maintenance"}"#).await;

        let (status, body) = send(coingecko_app(&base), post_json("/api/token/bitcoin/insight", "{}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Failed to fetch token data: bad response: HTTP 503"), "{}", detail);
    }

    #[tokio::test]
    async fn test_insight_upstream_unexpected_body() {
        let base = serve_canned("200 OK", r#"{"oops":1}"#).await;

        let (status, body) = send(coingecko_app(&base), post_json("/api/token/bitcoin/insight", "{}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Failed to fetch token data: parse error: "), "{}", detail);
    }
}
