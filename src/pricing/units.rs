//! Conversion between human units and a token's smallest unit.

use std::str::FromStr;

use alloy::primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::BigDecimal;

use crate::error::{Error, Result};

/// Most decimal digits a 256-bit integer can have
const U256_MAX_DIGITS: i64 = 78;

/// Scales a human amount to the token's smallest unit: `amount * 10^decimals`.
///
/// The size of the result is checked on the amount's digits and exponent
/// before any scaling, so exponent notation such as `1e1000000` is rejected
/// without materializing the number.
///
/// # Errors
/// * `InvalidInput` if the amount is not positive, has more fractional digits
///   than `decimals`, or does not fit in 256 bits once scaled
pub fn parse_units(amount: &BigDecimal, decimals: u8) -> Result<U256> {
    if amount.sign() != Sign::Plus {
        return Err(Error::invalid_input("amountIn", "must be positive"));
    }

    // amount = digits * 10^-scale
    let (digits, scale) = amount.as_bigint_and_exponent();
    let digit_count = i64::try_from(digits.to_string().len()).unwrap_or(i64::MAX);
    let shift = i64::from(decimals).saturating_sub(scale);

    if digit_count.saturating_add(shift) > U256_MAX_DIGITS {
        return Err(Error::invalid_input("amountIn", "too large"));
    }

    let raw = if shift >= 0 {
        digits * BigInt::from(10u8).pow(pow_exponent(shift)?)
    } else {
        // Extra fractional digits are accepted only if they are zeros
        let excess = shift.saturating_neg();
        if excess >= digit_count {
            return Err(too_precise(decimals));
        }
        let divisor = BigInt::from(10u8).pow(pow_exponent(excess)?);
        if &digits % &divisor != BigInt::from(0u8) {
            return Err(too_precise(decimals));
        }
        digits / divisor
    };

    U256::from_str(&raw.to_string()).map_err(|_| Error::invalid_input("amountIn", "too large"))
}

/// Exponent of a power of ten already bounded by the digit checks
fn pow_exponent(shift: i64) -> Result<u32> {
    u32::try_from(shift).map_err(|_| Error::invalid_input("amountIn", "too large"))
}

/// Rejection of an amount finer than the token's smallest unit
fn too_precise(decimals: u8) -> Error {
    Error::invalid_input("amountIn", format!("has more than {decimals} decimal places"))
}

/// Renders a smallest-unit amount in human units.
///
/// Trailing zeros of the fraction are dropped, one fractional digit is always
/// kept: `996000` with 3 decimals is `"996.0"`.
#[must_use]
pub fn format_units(raw: U256, decimals: u8) -> String {
    let decimals = usize::from(decimals);
    let digits = raw.to_string();
    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
    } else {
        digits
    };

    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{integer}.0")
    } else {
        format!("{integer}.{fraction}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(
            parse_units(&dec("100"), 18).unwrap(),
            U256::from(100u128 * 10u128.pow(18))
        );
        assert_eq!(parse_units(&dec("1.5"), 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_units(&dec("0.000001"), 6).unwrap(), U256::from(1u64));
        assert_eq!(parse_units(&dec("42"), 0).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_parse_units_rejects() {
        for (amount, decimals) in [("0", 18), ("-1", 18), ("0.0000001", 6), ("1.5", 0)] {
            assert!(
                matches!(
                    parse_units(&dec(amount), decimals),
                    Err(Error::InvalidInput { field: "amountIn", .. })
                ),
                "{amount} with {decimals} decimals"
            );
        }
        assert!(parse_units(&dec("1"), 255).is_err());
    }

    #[test]
    fn test_parse_units_trailing_zeros() {
        assert_eq!(parse_units(&dec("1.50"), 1).unwrap(), U256::from(15u64));
        assert_eq!(parse_units(&dec("2.000000"), 0).unwrap(), U256::from(2u64));
        assert_eq!(parse_units(&dec("1.5e3"), 0).unwrap(), U256::from(1_500u64));
    }

    #[test]
    fn test_parse_units_bounds() {
        // 2^256 - 1 has 78 digits
        let max = U256::MAX.to_string();
        assert_eq!(parse_units(&dec(&max), 0).unwrap(), U256::MAX);
        assert!(parse_units(&dec(&format!("{max}0")), 0).is_err());
        assert!(parse_units(&dec("1e77"), 0).is_ok());
        assert!(parse_units(&dec("1e78"), 0).is_err());
    }

    #[test]
    fn test_parse_units_extreme_exponents_fail_fast() {
        let started = std::time::Instant::now();
        for amount in ["1e1000000", "1e20000000", "1e-1000000", "1e-20000000"] {
            assert!(
                matches!(
                    parse_units(&dec(amount), 18),
                    Err(Error::InvalidInput { field: "amountIn", .. })
                ),
                "{amount} should be rejected"
            );
        }
        assert!(started.elapsed() < std::time::Duration::from_millis(100));
    }

    #[test]
    fn test_format_units() {
        for (raw, decimals, expected) in [
            (996u64, 0, "996.0"),
            (996_000, 3, "996.0"),
            (996, 18, "0.000000000000000996"),
            (1_500_000, 6, "1.5"),
            (0, 6, "0.0"),
            (12_345_678_901, 9, "12.345678901"),
        ] {
            assert_eq!(format_units(U256::from(raw), decimals), expected);
        }
    }

    #[test]
    fn test_parse_then_format() {
        let raw = parse_units(&dec("123.456"), 18).unwrap();
        assert_eq!(format_units(raw, 18), "123.456");
    }
}
