use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default public endpoints, tried in order until one answers a liveness
/// probe. Override with ETH_RPC_URLS / SOLANA_RPC_URLS (comma separated).
const DEFAULT_ETH_RPC_URLS: &str =
    "https://eth-mainnet.g.alchemy.com/v2/demo,https://eth.llamarpc.com,https://cloudflare-eth.com";
const DEFAULT_SOLANA_RPC_URLS: &str = "https://api.mainnet-beta.solana.com";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub eth_rpc_urls: Vec<String>,
    pub solana_rpc_urls: Vec<String>,

    /// Per-call timeout for RPC probes and queries, in seconds.
    pub rpc_timeout_secs: u64,
    /// Validity window for cached price quotes, in seconds.
    pub price_cache_ttl_secs: u64,

    /// How many most-recent blocks the transaction scanner walks.
    pub block_window: u64,
    /// Maximum number of transaction records collected per scan.
    pub transaction_cap: usize,
    /// Block fetches kept in flight by the scanner's worker pool.
    pub block_fetch_concurrency: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            eth_rpc_urls: parse_url_list(
                &env::var("ETH_RPC_URLS").unwrap_or_else(|_| DEFAULT_ETH_RPC_URLS.to_string()),
            ),
            solana_rpc_urls: parse_url_list(
                &env::var("SOLANA_RPC_URLS")
                    .unwrap_or_else(|_| DEFAULT_SOLANA_RPC_URLS.to_string()),
            ),

            rpc_timeout_secs: env::var("RPC_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Failed to parse RPC_TIMEOUT_SECS")?,
            price_cache_ttl_secs: env::var("PRICE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Failed to parse PRICE_CACHE_TTL_SECS")?,

            block_window: env::var("BLOCK_WINDOW")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("Failed to parse BLOCK_WINDOW")?,
            transaction_cap: env::var("TRANSACTION_CAP")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .context("Failed to parse TRANSACTION_CAP")?,
            block_fetch_concurrency: env::var("BLOCK_FETCH_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("Failed to parse BLOCK_FETCH_CONCURRENCY")?,
        })
    }
}

fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
