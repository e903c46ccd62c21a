//! Report data model: the terminal aggregate handed to the presentation
//! layer. Everything here is request-scoped and never persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chain {
    Ethereum,
    Solana,
}

impl Chain {
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETH",
            Chain::Solana => "SOL",
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Ethereum => write!(f, "Ethereum"),
            Chain::Solana => write!(f, "Solana"),
        }
    }
}

/// Core per-account figures, built fresh on every scan.
///
/// Balances and USD values stay at full precision here; rounding to the
/// cent happens only when a field is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub chain: Chain,
    pub address: String,
    pub native_balance: Decimal,
    pub usd_value: Decimal,
    /// Nonce of the account; Ethereum only.
    pub transaction_count: Option<u64>,
    /// Current gas price in gwei; Ethereum only.
    pub gas_price_gwei: Option<Decimal>,
    /// Reverse-resolved name (ENS), absent when the lookup fails or the
    /// chain has no naming scheme.
    pub resolved_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    /// Absent for contract creations.
    pub to: Option<String>,
    pub native_value: Decimal,
    pub usd_value: Decimal,
    pub block_timestamp: DateTime<Utc>,
    pub age: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalanceRecord {
    pub symbol: String,
    pub ui_amount: Decimal,
}

/// Token enumeration outcome. `Unavailable` is deliberately distinct from
/// `Listed(vec![])` so a failed token query is never mistaken for an
/// address that legitimately holds zero tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TokenHoldings {
    Listed(Vec<TokenBalanceRecord>),
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub snapshot: AccountSnapshot,
    /// Newest first, capped; Ethereum path only.
    pub transactions: Option<Vec<TransactionRecord>>,
    /// Solana path only.
    pub tokens: Option<TokenHoldings>,
}

impl Report {
    /// Pure merge of the pipeline outputs; no I/O, no failure modes.
    pub fn assemble(
        snapshot: AccountSnapshot,
        transactions: Option<Vec<TransactionRecord>>,
        tokens: Option<TokenHoldings>,
    ) -> Self {
        Self {
            snapshot,
            transactions,
            tokens,
        }
    }
}

/// Render a USD amount to the cent, with thousands grouping.
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let raw = format!("{:.2}", rounded);
    let (whole, cents) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let (sign, digits) = whole.strip_prefix('-').map_or(("", whole), |d| ("-", d));
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}{}.{}", sign, grouped, cents)
}

/// Render a native balance to six decimal places, the way the dashboard
/// shows it.
pub fn format_native(value: Decimal, symbol: &str) -> String {
    format!("{:.6} {}", value.round_dp(6), symbol)
}

/// Humanize the distance between a block timestamp and now.
pub fn describe_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - timestamp).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
