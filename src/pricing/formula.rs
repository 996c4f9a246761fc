//! Constant-product output amount with the 0.3% protocol fee.

use alloy::primitives::{Uint, U256};

use crate::error::{Error, Result};

/// Fee numerator of the protocol: 0.3% fee leaves 997/1000 of the input
pub const FEE_NUMERATOR: u64 = 997;
/// Fee denominator of the protocol
pub const FEE_DENOMINATOR: u64 = 1000;

/// Wide enough for `U256::MAX * 997 * U256::MAX`
type U768 = Uint<768, 12>;

/// Output amount of a swap against a constant-product pool.
///
/// ```text
/// amount_in_with_fee = amount_in * 997
/// amount_out = amount_in_with_fee * reserve_out / (reserve_in * 1000 + amount_in_with_fee)
/// ```
///
/// Intermediates are computed in 768 bits, so no input can overflow. The
/// division floors.
///
/// # Errors
/// * `InsufficientInputAmount` if `amount_in` is zero
/// * `InsufficientLiquidity` if either reserve is zero
pub fn get_amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
    if amount_in.is_zero() {
        return Err(Error::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(Error::InsufficientLiquidity);
    }

    let amount_in_with_fee = U768::from(amount_in) * U768::from(FEE_NUMERATOR);
    let numerator = amount_in_with_fee * U768::from(reserve_out);
    let denominator = U768::from(reserve_in) * U768::from(FEE_DENOMINATOR) + amount_in_with_fee;

    // The quotient is below reserve_out, so it always fits.
    U256::checked_from_uint(numerator / denominator)
        .ok_or_else(|| Error::Unexpected("amount out exceeds 256 bits".to_string()))
}
