//! Address classification for the scan front door.
//!
//! The ordering of the checks is load-bearing: the fixed-length "0x" test
//! for Ethereum runs before any base58 decode attempt, since some malformed
//! hex strings would otherwise decode as base58.

/// What a raw input string looks like, before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Ethereum,
    Solana,
    /// Not an address, but plausibly an ENS name to resolve.
    EnsName,
    Unrecognized,
}

/// Classify a raw input string by shape only. Hex validity of an
/// Ethereum-shaped string is deliberately not checked here; a bad-hex input
/// fails later, when the address is parsed for the balance query.
pub fn classify(raw: &str) -> AddressKind {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return AddressKind::Unrecognized;
    }
    if trimmed.starts_with("0x") {
        if trimmed.len() == 42 {
            return AddressKind::Ethereum;
        }
        return AddressKind::Unrecognized;
    }
    if let Ok(bytes) = bs58::decode(trimmed).into_vec() {
        if bytes.len() == 32 {
            return AddressKind::Solana;
        }
    }
    AddressKind::EnsName
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eth_shape_wins_regardless_of_hex_validity() {
        // 42 chars, "0x" prefix, but not valid hex: still Ethereum-shaped.
        let junk = format!("0x{}", "zz".repeat(20));
        assert_eq!(junk.len(), 42);
        assert_eq!(classify(&junk), AddressKind::Ethereum);

        assert_eq!(
            classify("0x0000000000000000000000000000000000dEaD"),
            AddressKind::Unrecognized,
            "40 chars is too short"
        );
        assert_eq!(
            classify("0x0000000000000000000000000000000000000000000000dEaD"),
            AddressKind::Unrecognized,
            "52 chars is too long"
        );
    }

    #[test]
    fn test_dead_address_classifies_ethereum() {
        let s = "0x000000000000000000000000000000000000dEaD";
        assert_eq!(s.len(), 42);
        assert_eq!(classify(s), AddressKind::Ethereum);
    }

    #[test]
    fn test_solana_pubkey_classifies_solana() {
        // System program id: 32 bytes of zeros in base58.
        assert_eq!(
            classify("11111111111111111111111111111111"),
            AddressKind::Solana
        );
        // Wrapped SOL mint.
        assert_eq!(
            classify("So11111111111111111111111111111111111111112"),
            AddressKind::Solana
        );
    }

    #[test]
    fn test_44_char_base58_pubkey_classifies_solana() {
        let encoded = bs58::encode([0xffu8; 32]).into_string();
        assert_eq!(encoded.len(), 44);
        assert_eq!(classify(&encoded), AddressKind::Solana);
    }

    #[test]
    fn test_short_base58_falls_through_to_name() {
        // Decodes as base58 but not to 32 bytes, and has no "0x" prefix.
        assert_eq!(classify("abc123"), AddressKind::EnsName);
        assert_eq!(classify("vitalik.eth"), AddressKind::EnsName);
    }

    #[test]
    fn test_empty_and_whitespace_unrecognized() {
        assert_eq!(classify(""), AddressKind::Unrecognized);
        assert_eq!(classify("   "), AddressKind::Unrecognized);
    }

    #[test]
    fn test_input_is_trimmed() {
        assert_eq!(
            classify("  0x000000000000000000000000000000000000dEaD\n"),
            AddressKind::Ethereum
        );
    }
}
