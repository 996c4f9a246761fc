use alloy::primitives::{keccak256, Address, B256};

use crate::error::Result;
use crate::models::TokenPair;
use crate::utils::constants::{UNISWAP_V2_FACTORY, UNISWAP_V2_INIT_CODE_HASH};

/// Derives the address of the pair contract of two tokens.
///
/// Implementations must be pure: the same two tokens, in either order, always
/// give the same address.
pub trait PairAddressDerivation: Send + Sync {
    /// Address of the pair of `token_a` and `token_b`.
    ///
    /// # Errors
    /// * `InvalidInput` if the two tokens are identical
    fn derive_pair_address(&self, token_a: Address, token_b: Address) -> Result<Address>;
}

/// CREATE2 derivation used by Uniswap V2 style factories.
///
/// `pair = keccak256(0xff ++ factory ++ keccak256(token0 ++ token1) ++ init_code_hash)[12..]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniswapV2Derivation {
    /// Factory deploying the pairs
    pub factory: Address,
    /// Keccak hash of the pair creation code
    pub init_code_hash: B256,
}

impl Default for UniswapV2Derivation {
    fn default() -> Self {
        Self::new(UNISWAP_V2_FACTORY, UNISWAP_V2_INIT_CODE_HASH)
    }
}

impl UniswapV2Derivation {
    /// Creates a derivation for the given factory constants
    #[must_use]
    pub const fn new(factory: Address, init_code_hash: B256) -> Self {
        Self {
            factory,
            init_code_hash,
        }
    }

    /// Salt of a pair: the hash of both token addresses packed in canonical order
    #[must_use]
    pub fn salt(pair: &TokenPair) -> B256 {
        let mut packed = [0u8; 40];
        packed[..20].copy_from_slice(pair.token0.as_slice());
        packed[20..].copy_from_slice(pair.token1.as_slice());
        keccak256(packed)
    }
}

impl PairAddressDerivation for UniswapV2Derivation {
    fn derive_pair_address(&self, token_a: Address, token_b: Address) -> Result<Address> {
        let pair = TokenPair::new(token_a, token_b)?;
        Ok(self
            .factory
            .create2(Self::salt(&pair), self.init_code_hash))
    }
}
