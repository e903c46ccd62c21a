//! Token balance enumeration for a Solana owner.
//!
//! A failed query is surfaced as `TokenHoldings::Unavailable`, which is
//! distinct from an address that legitimately holds zero tokens.

use rust_decimal::Decimal;
use serde_json::Value;
use solana_account_decoder::UiAccountData;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::models::report::{TokenBalanceRecord, TokenHoldings};
use crate::solana::client::SolanaClient;

/// How many characters of the mint stand in for a missing symbol.
const MINT_PREFIX_LEN: usize = 6;

pub async fn list_tokens(client: &SolanaClient, owner: &Pubkey) -> TokenHoldings {
    match client.get_parsed_token_accounts(owner).await {
        Ok(accounts) => {
            let balances = collect_balances(&accounts);
            debug!(
                "{} of {} token account(s) for {} hold a non-zero balance",
                balances.len(),
                accounts.len(),
                owner
            );
            TokenHoldings::Listed(balances)
        }
        Err(e) => {
            warn!("Token account query for {} failed: {}", owner, e);
            TokenHoldings::Unavailable
        }
    }
}

fn collect_balances(accounts: &[RpcKeyedAccount]) -> Vec<TokenBalanceRecord> {
    accounts
        .iter()
        .filter_map(|keyed| match &keyed.account.data {
            UiAccountData::Json(parsed) => balance_from_parsed(&parsed.parsed),
            _ => None,
        })
        .collect()
}

/// Extract a non-zero balance from the JSON-parsed token account payload.
/// Zero balances and payloads missing the amount are dropped; the symbol
/// falls back to a prefix of the mint.
fn balance_from_parsed(parsed: &Value) -> Option<TokenBalanceRecord> {
    let info = parsed.get("info")?;
    let ui_amount = info.get("tokenAmount")?.get("uiAmount")?.as_f64()?;
    if ui_amount <= 0.0 {
        return None;
    }

    let symbol = info
        .get("symbol")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            info.get("mint")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .chars()
                .take(MINT_PREFIX_LEN)
                .collect()
        });

    Some(TokenBalanceRecord {
        symbol,
        ui_amount: Decimal::from_f64_retain(ui_amount).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn token_account(mint: &str, ui_amount: Value) -> Value {
        json!({
            "type": "account",
            "info": {
                "mint": mint,
                "owner": "owner11111111111111111111111111111111111111",
                "tokenAmount": {
                    "amount": "123456",
                    "decimals": 6,
                    "uiAmount": ui_amount,
                    "uiAmountString": "0.123456"
                }
            }
        })
    }

    #[test]
    fn test_positive_balance_kept_with_mint_prefix_symbol() {
        let parsed = token_account("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", json!(12.5));
        let record = balance_from_parsed(&parsed).unwrap();
        assert_eq!(record.symbol, "EPjFWd");
        assert_eq!(record.ui_amount, dec!(12.5));
    }

    #[test]
    fn test_symbol_metadata_wins_over_mint_prefix() {
        let mut parsed = token_account("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", json!(1.0));
        parsed["info"]["symbol"] = json!("USDC");
        let record = balance_from_parsed(&parsed).unwrap();
        assert_eq!(record.symbol, "USDC");
    }

    #[test]
    fn test_zero_and_null_balances_dropped() {
        let zero = token_account("Mint11111111111111111111111111111111111111", json!(0.0));
        assert!(balance_from_parsed(&zero).is_none());
        let null = token_account("Mint11111111111111111111111111111111111111", Value::Null);
        assert!(balance_from_parsed(&null).is_none());
    }

    #[test]
    fn test_malformed_payload_dropped() {
        assert!(balance_from_parsed(&json!({})).is_none());
        assert!(balance_from_parsed(&json!({"info": {}})).is_none());
    }
}
