use alloy::primitives::Address;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Parses a token address supplied by a caller.
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase and all-uppercase
/// inputs are taken as-is; mixed-case inputs must carry a valid EIP-55
/// checksum. The zero address is rejected.
///
/// # Arguments
/// * `field` - Name of the request field, reported back on failure
/// * `text` - The address as supplied
///
/// # Errors
/// * `InvalidInput` naming `field` if the address is malformed, has a wrong
///   checksum or is the zero address
pub fn parse_token_address(field: &'static str, text: &str) -> Result<Address> {
    let trimmed = text.trim();
    let Some(hex) = trimmed.strip_prefix("0x") else {
        return Err(Error::invalid_input(field, format!("{text} must start with 0x")));
    };
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::invalid_input(
            field,
            format!("{text} is not a 20-byte hex address"),
        ));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    let address = if has_lower && has_upper {
        Address::parse_checksummed(trimmed, None)
            .map_err(|_| Error::invalid_input(field, format!("{text} has an invalid checksum")))?
    } else {
        Address::from_str(trimmed).map_err(|e| Error::invalid_input(field, e.to_string()))?
    };

    if address == Address::ZERO {
        return Err(Error::invalid_input(field, "zero address"));
    }
    Ok(address)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_accepts_checksummed_and_lowercase() {
        let weth = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
        assert_eq!(
            parse_token_address("fromToken", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap(),
            weth
        );
        assert_eq!(
            parse_token_address("fromToken", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap(),
            weth
        );
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let bad_checksum = "0xc02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
        let err = parse_token_address("toToken", bad_checksum).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "toToken", .. }));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            "0x1234",
            "0xZZ2aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "0x0000000000000000000000000000000000000000",
        ] {
            assert!(
                matches!(
                    parse_token_address("fromToken", bad),
                    Err(Error::InvalidInput { field: "fromToken", .. })
                ),
                "{bad} should be rejected"
            );
        }
    }
}
