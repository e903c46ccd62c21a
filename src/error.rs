use thiserror::Error;

/// Scan failure taxonomy. Sub-query failures (gas price, reverse name,
/// single block fetch, token enumeration, price) never surface here; they
/// degrade the report instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid address or name: {0}")]
    InvalidAddress(String),

    #[error("No RPC endpoint available: {0}")]
    EndpointUnavailable(String),

    #[error("Scan failed: {0}")]
    ScanFailed(String),
}
