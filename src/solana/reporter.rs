//! Account snapshot for a Solana public key.
//!
//! Transaction count, gas price and reverse naming have no counterpart on
//! this path and stay absent; only the lamport balance query is fatal.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::ScanError;
use crate::models::report::{AccountSnapshot, Chain};
use crate::solana::client::SolanaClient;

pub async fn report(
    client: &SolanaClient,
    pubkey: &Pubkey,
    price_usd: Decimal,
) -> Result<AccountSnapshot, ScanError> {
    let lamports = client.get_balance_lamports(pubkey).await.map_err(|e| {
        ScanError::ScanFailed(format!(
            "balance query for {} against {} failed: {}",
            pubkey,
            client.url(),
            e
        ))
    })?;

    let native_balance = lamports_to_sol(lamports);
    debug!("Snapshot for {}: {} SOL", pubkey, native_balance);

    Ok(AccountSnapshot {
        chain: Chain::Solana,
        address: pubkey.to_string(),
        native_balance,
        usd_value: native_balance * price_usd,
        transaction_count: None,
        gas_price_gwei: None,
        resolved_name: None,
    })
}

pub(crate) fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from(lamports) / dec!(1_000_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(1_000_000_000), dec!(1));
        assert_eq!(lamports_to_sol(1_500_000_000), dec!(1.5));
        assert_eq!(lamports_to_sol(1), dec!(0.000000001));
        assert_eq!(lamports_to_sol(0), dec!(0));
    }

    #[test]
    fn test_usd_value_keeps_full_precision() {
        let sol = lamports_to_sol(1_234_567_890);
        let usd = sol * dec!(150.25);
        // No cent rounding before display.
        assert_eq!(usd, dec!(185.4938254725));
    }
}
