//! Solana RPC handle with ordered-fallback endpoint selection.
//!
//! The upstream client is blocking, so every call runs through
//! `spawn_blocking`. The handle is owned by the scan context and passed
//! down explicitly.

use anyhow::{anyhow, Result};
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ScanError;

#[derive(Clone)]
pub struct SolanaClient {
    rpc_client: Arc<RpcClient>,
    url: String,
}

impl SolanaClient {
    /// Probe each candidate URL in order with a version call; the first
    /// one to answer becomes the live endpoint. Fails with
    /// `EndpointUnavailable` when every candidate is dead.
    pub async fn connect(candidates: &[String], timeout: Duration) -> Result<Self, ScanError> {
        for url in candidates {
            let client = Arc::new(RpcClient::new_with_timeout_and_commitment(
                url.clone(),
                timeout,
                CommitmentConfig::confirmed(),
            ));
            let probe = {
                let client = client.clone();
                tokio::task::spawn_blocking(move || client.get_version()).await
            };
            match probe {
                Ok(Ok(version)) => {
                    info!(
                        "Connected to Solana RPC {} (solana-core {})",
                        url, version.solana_core
                    );
                    return Ok(Self {
                        rpc_client: client,
                        url: url.clone(),
                    });
                }
                Ok(Err(e)) => warn!("Solana RPC {} failed liveness check: {}", url, e),
                Err(e) => warn!("Liveness probe task for {} failed: {}", url, e),
            }
        }
        Err(ScanError::EndpointUnavailable(
            "no Solana RPC candidate responded".to_string(),
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    // Runs a blocking RPC call on the blocking pool.
    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Arc<RpcClient>) -> solana_client::client_error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.rpc_client.clone();
        let value = tokio::task::spawn_blocking(move || f(client))
            .await?
            .map_err(|e| anyhow!("Solana RPC client error: {}", e))?;
        Ok(value)
    }

    pub async fn get_balance_lamports(&self, pubkey: &Pubkey) -> Result<u64> {
        let pubkey = *pubkey;
        self.run_blocking(move |client| client.get_balance(&pubkey))
            .await
    }

    /// Token accounts owned by `owner` under the SPL token program, in the
    /// JSON-parsed encoding.
    pub async fn get_parsed_token_accounts(&self, owner: &Pubkey) -> Result<Vec<RpcKeyedAccount>> {
        let owner = *owner;
        self.run_blocking(move |client| {
            client.get_token_accounts_by_owner(
                &owner,
                TokenAccountsFilter::ProgramId(spl_token::id()),
            )
        })
        .await
    }
}
