//! Account snapshot for an Ethereum address.
//!
//! The balance query is the only fatal sub-query; nonce, gas price and the
//! reverse ENS lookup degrade to absent fields when they fail.

use ethers::providers::Middleware;
use ethers::types::Address;
use ethers::utils::to_checksum;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::ScanError;
use crate::eth::client::EthClient;
use crate::eth::{wei_to_eth, wei_to_gwei};
use crate::models::report::{AccountSnapshot, Chain};

pub async fn report(
    client: &EthClient,
    address: Address,
    price_usd: Decimal,
) -> Result<AccountSnapshot, ScanError> {
    snapshot(client.provider().as_ref(), client.url(), address, price_usd).await
}

pub(crate) async fn snapshot<M: Middleware>(
    provider: &M,
    endpoint: &str,
    address: Address,
    price_usd: Decimal,
) -> Result<AccountSnapshot, ScanError> {
    let balance_wei = provider.get_balance(address, None).await.map_err(|e| {
        ScanError::ScanFailed(format!(
            "balance query for {} against {} failed: {}",
            to_checksum(&address, None),
            endpoint,
            e
        ))
    })?;
    let native_balance = wei_to_eth(balance_wei);

    let transaction_count = match provider.get_transaction_count(address, None).await {
        Ok(count) => Some(count.as_u64()),
        Err(e) => {
            warn!("Transaction count query failed: {}", e);
            None
        }
    };

    let gas_price_gwei = match provider.get_gas_price().await {
        Ok(price) => Some(wei_to_gwei(price)),
        Err(e) => {
            warn!("Gas price query failed: {}", e);
            None
        }
    };

    let resolved_name = match provider.lookup_address(address).await {
        Ok(name) => Some(name),
        Err(e) => {
            debug!(
                "Reverse ENS lookup for {} failed: {}",
                to_checksum(&address, None),
                e
            );
            None
        }
    };

    debug!(
        "Snapshot for {}: {} ETH, nonce {:?}",
        to_checksum(&address, None),
        native_balance,
        transaction_count
    );

    Ok(AccountSnapshot {
        chain: Chain::Ethereum,
        address: to_checksum(&address, None),
        native_balance,
        usd_value: native_balance * price_usd,
        transaction_count,
        gas_price_gwei,
        resolved_name,
    })
}
