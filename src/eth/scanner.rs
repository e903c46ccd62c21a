//! Recent-transaction scan over a bounded block window.
//!
//! Blocks from `latest - window` to `latest` inclusive are fetched with
//! full bodies by a bounded worker pool (`buffered` keeps ascending block
//! order). A transaction matches when its sender or receiver equals the
//! target address; contract creations have no receiver and never match by
//! receiver. Collection stops at the cap. Individual block fetch failures
//! are skipped; partial results are expected. The collected sequence is
//! reversed at the end so the caller sees newest first.

use chrono::{DateTime, Utc};
use ethers::providers::Middleware;
use ethers::types::{Address, Block, BlockNumber, Transaction, U64};
use ethers::utils::to_checksum;
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::eth::client::EthClient;
use crate::eth::wei_to_eth;
use crate::models::report::{describe_age, TransactionRecord};

#[derive(Debug, Clone)]
pub struct ScanParams {
    pub block_window: u64,
    pub cap: usize,
    pub concurrency: usize,
}

/// Walk the recent block window and collect transactions touching
/// `address`, newest first, capped. Degrades to an empty list when the
/// head block cannot be determined.
pub async fn scan(
    client: &EthClient,
    address: Address,
    price_usd: Decimal,
    params: &ScanParams,
) -> Vec<TransactionRecord> {
    scan_with_provider(client.provider(), address, price_usd, params).await
}

pub(crate) async fn scan_with_provider<M: Middleware>(
    provider: Arc<M>,
    address: Address,
    price_usd: Decimal,
    params: &ScanParams,
) -> Vec<TransactionRecord> {
    let latest = match provider.get_block_number().await {
        Ok(number) => number.as_u64(),
        Err(e) => {
            warn!("Could not determine head block, skipping transaction scan: {}", e);
            return Vec::new();
        }
    };
    let from = latest.saturating_sub(params.block_window);
    debug!(
        "Scanning blocks {}..={} for {}",
        from,
        latest,
        to_checksum(&address, None)
    );

    let fetcher = provider.clone();
    let mut blocks = stream::iter(from..=latest)
        .map(move |number| {
            let provider = fetcher.clone();
            async move {
                let block = provider
                    .get_block_with_txs(BlockNumber::Number(U64::from(number)))
                    .await;
                (number, block)
            }
        })
        .buffered(params.concurrency.max(1));

    let now = Utc::now();
    let mut records = Vec::new();
    while let Some((number, result)) = blocks.next().await {
        let block = match result {
            Ok(Some(block)) => block,
            Ok(None) => {
                debug!("Block {} not available, skipping", number);
                continue;
            }
            Err(e) => {
                warn!("Block {} fetch failed, skipping: {}", number, e);
                continue;
            }
        };
        if append_block_matches(&mut records, &block, address, params.cap, price_usd, now) {
            break;
        }
    }

    // Collected in ascending block order; present newest first. The
    // reversal also flips intra-block ordering, as required.
    records.reverse();
    info!(
        "Found {} matching transaction(s) in the last {} block(s)",
        records.len(),
        params.block_window
    );
    records
}

fn tx_matches(tx: &Transaction, target: Address) -> bool {
    tx.from == target || tx.to.map_or(false, |to| to == target)
}

/// Append matches from one block, stopping at `cap`. Returns true once the
/// cap is reached.
fn append_block_matches(
    records: &mut Vec<TransactionRecord>,
    block: &Block<Transaction>,
    target: Address,
    cap: usize,
    price_usd: Decimal,
    now: DateTime<Utc>,
) -> bool {
    let timestamp =
        DateTime::<Utc>::from_timestamp(block.timestamp.as_u64() as i64, 0).unwrap_or(now);
    for tx in &block.transactions {
        if records.len() >= cap {
            return true;
        }
        if !tx_matches(tx, target) {
            continue;
        }
        let native_value = wei_to_eth(tx.value);
        records.push(TransactionRecord {
            hash: format!("{:#x}", tx.hash),
            from: to_checksum(&tx.from, None),
            to: tx.to.map(|to| to_checksum(&to, None)),
            native_value,
            usd_value: native_value * price_usd,
            block_timestamp: timestamp,
            age: describe_age(timestamp, now),
        });
    }
    records.len() >= cap
}
