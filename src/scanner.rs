//! Scan pipeline: classify → (resolve) → select endpoint → report →
//! (transaction scan | token enumeration) → assemble.
//!
//! The scanner owns the session-scoped state the pipeline shares between
//! requests: one live client handle per chain and the price cache. A live
//! handle is dropped (forcing a re-probe on the next scan) only when the
//! primary balance query against it fails outright.

use ethers::types::Address;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

use crate::address::{classify, AddressKind};
use crate::api::coingecko::{Asset, PriceOracle};
use crate::config::Config;
use crate::error::ScanError;
use crate::eth;
use crate::eth::client::EthClient;
use crate::eth::scanner::ScanParams;
use crate::models::report::Report;
use crate::solana;
use crate::solana::client::SolanaClient;

pub struct WalletScanner {
    config: Arc<Config>,
    price_oracle: PriceOracle,
    eth_client: Mutex<Option<Arc<EthClient>>>,
    solana_client: Mutex<Option<Arc<SolanaClient>>>,
}

impl WalletScanner {
    pub fn new(config: Arc<Config>) -> Self {
        let price_oracle = PriceOracle::new(Duration::from_secs(config.price_cache_ttl_secs));
        Self {
            config,
            price_oracle,
            eth_client: Mutex::new(None),
            solana_client: Mutex::new(None),
        }
    }

    /// Run one scan for a raw address or name string.
    pub async fn scan(&self, raw: &str) -> Result<Report, ScanError> {
        let input = raw.trim();
        match classify(input) {
            AddressKind::Ethereum => {
                let address = input.parse::<Address>().map_err(|_| {
                    ScanError::InvalidAddress(format!("{} is not a valid hex address", input))
                })?;
                self.scan_ethereum(address).await
            }
            AddressKind::EnsName => {
                let client = self.eth_client().await?;
                let address = client.resolve_name(input).await.ok_or_else(|| {
                    ScanError::InvalidAddress(format!("could not resolve name {}", input))
                })?;
                info!("Resolved {} to {:?}", input, address);
                self.scan_ethereum(address).await
            }
            AddressKind::Solana => {
                let pubkey = Pubkey::from_str(input).map_err(|_| {
                    ScanError::InvalidAddress(format!("{} is not a valid public key", input))
                })?;
                self.scan_solana(pubkey).await
            }
            AddressKind::Unrecognized => Err(ScanError::InvalidAddress(
                "input does not look like an address or a name".to_string(),
            )),
        }
    }

    async fn scan_ethereum(&self, address: Address) -> Result<Report, ScanError> {
        let client = self.eth_client().await?;
        let quote = self.price_oracle.get_price(Asset::Eth).await;

        let snapshot = match eth::reporter::report(&client, address, quote.usd).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // The live endpoint failed outright; re-probe next scan.
                *self.eth_client.lock().await = None;
                return Err(e);
            }
        };

        let params = ScanParams {
            block_window: self.config.block_window,
            cap: self.config.transaction_cap,
            concurrency: self.config.block_fetch_concurrency,
        };
        let transactions = eth::scanner::scan(&client, address, quote.usd, &params).await;

        Ok(Report::assemble(snapshot, Some(transactions), None))
    }

    async fn scan_solana(&self, pubkey: Pubkey) -> Result<Report, ScanError> {
        let client = self.solana_client().await?;
        let quote = self.price_oracle.get_price(Asset::Sol).await;

        let snapshot = match solana::reporter::report(&client, &pubkey, quote.usd).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                *self.solana_client.lock().await = None;
                return Err(e);
            }
        };

        let tokens = solana::tokens::list_tokens(&client, &pubkey).await;

        Ok(Report::assemble(snapshot, None, Some(tokens)))
    }

    async fn eth_client(&self) -> Result<Arc<EthClient>, ScanError> {
        let mut slot = self.eth_client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Arc::new(
            EthClient::connect(
                &self.config.eth_rpc_urls,
                Duration::from_secs(self.config.rpc_timeout_secs),
            )
            .await?,
        );
        *slot = Some(client.clone());
        Ok(client)
    }

    async fn solana_client(&self) -> Result<Arc<SolanaClient>, ScanError> {
        let mut slot = self.solana_client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Arc::new(
            SolanaClient::connect(
                &self.config.solana_rpc_urls,
                Duration::from_secs(self.config.rpc_timeout_secs),
            )
            .await?,
        );
        *slot = Some(client.clone());
        Ok(client)
    }
}
