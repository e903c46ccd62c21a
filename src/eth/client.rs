//! Ethereum RPC handle with ordered-fallback endpoint selection.
//!
//! The handle is owned by the scan context and passed down explicitly;
//! nothing here is global state. The underlying HTTP client carries the
//! configured per-call timeout, so the liveness probe and every later
//! query through the provider are bounded by the same limit.

use ethers::providers::{Http, Middleware, Provider};
use ethers::types::Address;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ScanError;

#[derive(Debug, Clone)]
pub struct EthClient {
    provider: Arc<Provider<Http>>,
    url: String,
}

impl EthClient {
    /// Probe each candidate URL in order with a block-number call; the
    /// first one to answer within the timeout becomes the live endpoint.
    /// Fails with `EndpointUnavailable` when every candidate is dead.
    pub async fn connect(candidates: &[String], rpc_timeout: Duration) -> Result<Self, ScanError> {
        let http = reqwest::Client::builder()
            .timeout(rpc_timeout)
            .build()
            .expect("Failed to create HTTP client for Ethereum RPC");

        for url in candidates {
            let parsed = match url.parse::<Url>() {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Skipping malformed Ethereum RPC URL {}: {}", url, e);
                    continue;
                }
            };
            let provider = Provider::new(Http::new_with_client(parsed, http.clone()));
            match provider.get_block_number().await {
                Ok(block) => {
                    info!("Connected to Ethereum RPC {} (head block {})", url, block);
                    return Ok(Self {
                        provider: Arc::new(provider),
                        url: url.clone(),
                    });
                }
                Err(e) => warn!("Ethereum RPC {} failed liveness check: {}", url, e),
            }
        }
        Err(ScanError::EndpointUnavailable(
            "no Ethereum RPC candidate responded".to_string(),
        ))
    }

    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single best-effort ENS forward resolution; any failure is `None`.
    pub async fn resolve_name(&self, name: &str) -> Option<Address> {
        match self.provider.resolve_name(name).await {
            Ok(address) => Some(address),
            Err(e) => {
                debug!("ENS resolution for {} failed: {}", name, e);
                None
            }
        }
    }
}
