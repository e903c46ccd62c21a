pub mod client;
pub mod reporter;
pub mod scanner;

use ethers::types::U256;
use ethers::utils::format_units;
use rust_decimal::Decimal;
use std::str::FromStr;

pub(crate) fn wei_to_eth(wei: U256) -> Decimal {
    units_to_decimal(wei, "ether")
}

pub(crate) fn wei_to_gwei(wei: U256) -> Decimal {
    units_to_decimal(wei, "gwei")
}

fn units_to_decimal(value: U256, unit: &str) -> Decimal {
    format_units(value, unit)
        .ok()
        .and_then(|s| Decimal::from_str(&s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wei_to_eth() {
        assert_eq!(wei_to_eth(U256::exp10(18)), dec!(1));
        assert_eq!(
            wei_to_eth(U256::exp10(18) + U256::exp10(17) * 5u64),
            dec!(1.5)
        );
        assert_eq!(wei_to_eth(U256::zero()), dec!(0));
    }

    #[test]
    fn test_wei_to_gwei() {
        assert_eq!(wei_to_gwei(U256::exp10(9)), dec!(1));
        assert_eq!(wei_to_gwei(U256::from(21_400_000_000u64)), dec!(21.4));
    }
}
