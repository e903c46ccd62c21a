use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod address;
mod api;
mod config;
mod error;
mod eth;
mod models;
mod scanner;
mod solana;

use crate::config::Config;
use crate::error::ScanError;
use crate::models::report::{format_native, format_usd, Report, TokenHoldings};
use crate::scanner::WalletScanner;

#[derive(Parser)]
#[command(
    name = "multichain-scanner",
    about = "Scan an Ethereum or Solana wallet: balance, USD value, recent transactions, token holdings"
)]
struct Cli {
    /// Wallet address (0x... or base58 public key) or ENS name
    address: String,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv().ok();
    let cli = Cli::parse();

    let config = Arc::new(Config::load()?);
    let scanner = WalletScanner::new(config);

    match scanner.scan(&cli.address).await {
        Ok(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Err(e @ ScanError::EndpointUnavailable(_)) => {
            eprintln!("{} — try again later", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(report: &Report) {
    let snapshot = &report.snapshot;

    println!("═══════════════════════════════════════════════");
    println!("{} wallet", snapshot.chain);
    println!("═══════════════════════════════════════════════");
    println!("Address:        {}", snapshot.address);
    if let Some(name) = &snapshot.resolved_name {
        println!("Name:           {}", name);
    }
    println!(
        "Balance:        {}",
        format_native(snapshot.native_balance, snapshot.chain.native_symbol())
    );
    println!("USD Value:      {}", format_usd(snapshot.usd_value));
    if let Some(count) = snapshot.transaction_count {
        println!("Transactions:   {}", count);
    }
    if let Some(gas) = snapshot.gas_price_gwei {
        println!("Gas Price:      {:.2} gwei", gas.round_dp(2));
    }

    if let Some(transactions) = &report.transactions {
        println!();
        if transactions.is_empty() {
            println!("No transactions in the recent block window.");
        } else {
            println!("Recent transactions (newest first):");
            for tx in transactions {
                let to = tx.to.as_deref().unwrap_or("<contract creation>");
                println!(
                    "  {}  {}  {} -> {}  {}",
                    tx.age,
                    format_usd(tx.usd_value),
                    tx.from,
                    to,
                    tx.hash
                );
            }
        }
    }

    if let Some(tokens) = &report.tokens {
        println!();
        match tokens {
            TokenHoldings::Listed(balances) if balances.is_empty() => {
                println!("No token balances.");
            }
            TokenHoldings::Listed(balances) => {
                println!("Token balances:");
                for token in balances {
                    println!("  {:>16}  {}", token.ui_amount, token.symbol);
                }
            }
            TokenHoldings::Unavailable => {
                println!("Token balances could not be retrieved.");
            }
        }
    }
}
