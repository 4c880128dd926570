use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

/// Whether `address` parses as a base58 Solana account address.
pub fn is_well_formed(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}

/// Masked display form of an account address: `first4...last4`.
///
/// Addresses short enough that masking would hide nothing are returned
/// unchanged. Only call this at the response boundary; stored records keep
/// the full address.
pub fn mask(address: &str) -> String {
    if address.len() <= 8 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..4], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_long_address() {
        assert_eq!(mask("Ab12Cd34Ef56Gh78Ij90"), "Ab12...Ij90");
    }

    #[test]
    fn test_mask_short_address_unchanged() {
        assert_eq!(mask("Ab12Cd34"), "Ab12Cd34");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_well_formed_addresses() {
        // System program id is a valid base58 pubkey
        assert!(is_well_formed("11111111111111111111111111111111"));
        assert!(is_well_formed(&Pubkey::new_unique().to_string()));
        assert!(!is_well_formed("not-an-address"));
        assert!(!is_well_formed(""));
    }
}
