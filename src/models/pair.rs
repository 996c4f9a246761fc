use alloy::primitives::{Address, U256};

use crate::error::{Error, Result};

/// An unordered pair of tokens stored in canonical order.
///
/// `token0` is the token whose address sorts first. Comparing the raw 20 bytes
/// is the same as comparing the lower-cased hex renderings, which is the order
/// the pair contract uses for `reserve0` / `reserve1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenPair {
    /// The token that sorts first
    pub token0: Address,
    /// The token that sorts second
    pub token1: Address,
}

impl TokenPair {
    /// Creates the canonical pair of two tokens, in either order.
    ///
    /// # Errors
    /// * `InvalidInput` if both tokens are the same address
    pub fn new(token_a: Address, token_b: Address) -> Result<Self> {
        if token_a == token_b {
            return Err(Error::invalid_input(
                "toToken",
                format!("identical token addresses {token_a}"),
            ));
        }
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self { token0, token1 })
    }

    /// True if `token` is the pair's `token0`
    #[must_use]
    pub fn is_token0(&self, token: Address) -> bool {
        self.token0 == token
    }
}

/// Reserves of a pair oriented to a swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
    /// Reserve of the token being sold
    pub reserve_in: U256,
    /// Reserve of the token being bought
    pub reserve_out: U256,
}

impl Reserves {
    /// Orients the raw `(reserve0, reserve1)` of `pair` to a swap that sells
    /// `from_token`.
    #[must_use]
    pub fn oriented(pair: &TokenPair, from_token: Address, reserve0: U256, reserve1: U256) -> Self {
        if pair.is_token0(from_token) {
            Self {
                reserve_in: reserve0,
                reserve_out: reserve1,
            }
        } else {
            Self {
                reserve_in: reserve1,
                reserve_out: reserve0,
            }
        }
    }
}

impl From<Reserves> for (U256, U256) {
    fn from(reserves: Reserves) -> Self {
        (reserves.reserve_in, reserves.reserve_out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const LOW: Address = address!("0x1000000000000000000000000000000000000001");
    const HIGH: Address = address!("0xF000000000000000000000000000000000000002");

    #[test]
    fn test_canonical_order() {
        let forward = TokenPair::new(LOW, HIGH).unwrap();
        let backward = TokenPair::new(HIGH, LOW).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.token0, LOW);
        assert_eq!(forward.token1, HIGH);
    }

    #[test]
    fn test_order_matches_lowercase_hex() {
        let a = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        let b = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
        let pair = TokenPair::new(b, a).unwrap();
        assert!(
            pair.token0.to_string().to_lowercase() < pair.token1.to_string().to_lowercase()
        );
        assert_eq!(pair.token0, a);
    }

    #[test]
    fn test_identical_tokens() {
        assert!(matches!(
            TokenPair::new(LOW, LOW),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_oriented() {
        let pair = TokenPair::new(HIGH, LOW).unwrap();
        let r0 = U256::from(100);
        let r1 = U256::from(200);
        assert_eq!(
            <(U256, U256)>::from(Reserves::oriented(&pair, LOW, r0, r1)),
            (r0, r1)
        );
        assert_eq!(
            <(U256, U256)>::from(Reserves::oriented(&pair, HIGH, r0, r1)),
            (r1, r0)
        );
    }
}
