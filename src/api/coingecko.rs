//! Spot-price oracle backed by the CoinGecko simple-price endpoint.
//!
//! A scan must never fail purely because price data is unavailable, so
//! `get_price` is infallible: any fetch problem substitutes a hardcoded
//! fallback quote. Quotes are cached per asset for a short validity window
//! (fallback quotes too, so at most one request goes out per window).

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

const COINGECKO_BASE_URL: &str = "https://api.coingecko.com";

/// Native asset whose USD spot price can be quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Eth,
    Sol,
}

impl Asset {
    fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::Eth => "ethereum",
            Asset::Sol => "solana",
        }
    }

    /// Last-resort value used when the price API cannot be reached.
    fn fallback_price(&self) -> Decimal {
        match self {
            Asset::Eth => dec!(3000),
            Asset::Sol => dec!(150),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub asset: Asset,
    /// USD per unit of the native asset.
    pub usd: Decimal,
    pub source: QuoteSource,
    fetched_at: Instant,
}

pub struct PriceOracle {
    client: Client,
    base_url: String,
    ttl: Duration,
    cache: RwLock<HashMap<Asset, PriceQuote>>,
}

impl PriceOracle {
    pub fn new(ttl: Duration) -> Self {
        Self::with_base_url(COINGECKO_BASE_URL.to_string(), ttl)
    }

    pub fn with_base_url(base_url: String, ttl: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client for CoinGecko"),
            base_url,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached quote when still valid, otherwise refresh with a
    /// single request. Never fails.
    pub async fn get_price(&self, asset: Asset) -> PriceQuote {
        {
            let cache = self.cache.read().await;
            if let Some(quote) = cache.get(&asset) {
                if quote.fetched_at.elapsed() < self.ttl {
                    return quote.clone();
                }
            }
        }

        let quote = match self.fetch_spot(asset).await {
            Ok(usd) => {
                debug!("Fetched {:?} spot price: {} USD", asset, usd);
                PriceQuote {
                    asset,
                    usd,
                    source: QuoteSource::Live,
                    fetched_at: Instant::now(),
                }
            }
            Err(e) => {
                warn!(
                    "Price fetch for {:?} failed ({}); using fallback {}",
                    asset,
                    e,
                    asset.fallback_price()
                );
                PriceQuote {
                    asset,
                    usd: asset.fallback_price(),
                    source: QuoteSource::Fallback,
                    fetched_at: Instant::now(),
                }
            }
        };

        self.cache.write().await.insert(asset, quote.clone());
        quote
    }

    async fn fetch_spot(&self, asset: Asset) -> Result<Decimal> {
        let id = asset.coingecko_id();
        let url = format!("{}/api/v3/simple/price", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", id), ("vs_currencies", "usd")])
            .send()
            .await
            .context("Failed to send request to CoinGecko")?;

        if !response.status().is_success() {
            return Err(anyhow!("CoinGecko returned {}", response.status()));
        }

        let body: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .context("Failed to parse CoinGecko response")?;

        let usd = body
            .get(id)
            .and_then(|m| m.get("usd"))
            .copied()
            .ok_or_else(|| anyhow!("Missing usd quote for {}", id))?;

        Decimal::try_from(usd).context("Quote is not representable as a decimal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn price_params(id: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("ids".into(), id.into()),
            Matcher::UrlEncoded("vs_currencies".into(), "usd".into()),
        ])
    }

    #[tokio::test]
    async fn test_live_quote_is_cached_within_window() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v3/simple/price")
            .match_query(price_params("ethereum"))
            .with_status(200)
            .with_body(r#"{"ethereum":{"usd":2500.0}}"#)
            .expect(1)
            .create_async()
            .await;

        let oracle = PriceOracle::with_base_url(server.url(), Duration::from_secs(60));
        let first = oracle.get_price(Asset::Eth).await;
        let second = oracle.get_price(Asset::Eth).await;

        assert_eq!(first.usd, dec!(2500));
        assert_eq!(first.source, QuoteSource::Live);
        assert_eq!(first, second);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_quote_issues_one_new_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v3/simple/price")
            .match_query(price_params("solana"))
            .with_status(200)
            .with_body(r#"{"solana":{"usd":150.5}}"#)
            .expect(2)
            .create_async()
            .await;

        // Zero TTL: every access is past the validity window.
        let oracle = PriceOracle::with_base_url(server.url(), Duration::ZERO);
        oracle.get_price(Asset::Sol).await;
        oracle.get_price(Asset::Sol).await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_masked_by_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/simple/price")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let oracle = PriceOracle::with_base_url(server.url(), Duration::from_secs(60));
        let quote = oracle.get_price(Asset::Eth).await;
        assert_eq!(quote.source, QuoteSource::Fallback);
        assert_eq!(quote.usd, dec!(3000));
    }

    #[tokio::test]
    async fn test_malformed_body_masked_by_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/simple/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"solana":{}}"#)
            .create_async()
            .await;

        let oracle = PriceOracle::with_base_url(server.url(), Duration::from_secs(60));
        let quote = oracle.get_price(Asset::Sol).await;
        assert_eq!(quote.source, QuoteSource::Fallback);
        assert_eq!(quote.usd, dec!(150));
    }

    #[tokio::test]
    async fn test_cache_is_per_asset() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/simple/price")
            .match_query(price_params("ethereum"))
            .with_status(200)
            .with_body(r#"{"ethereum":{"usd":2000.0}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v3/simple/price")
            .match_query(price_params("solana"))
            .with_status(200)
            .with_body(r#"{"solana":{"usd":100.0}}"#)
            .create_async()
            .await;

        let oracle = PriceOracle::with_base_url(server.url(), Duration::from_secs(60));
        assert_eq!(oracle.get_price(Asset::Eth).await.usd, dec!(2000));
        assert_eq!(oracle.get_price(Asset::Sol).await.usd, dec!(100));
    }
}
