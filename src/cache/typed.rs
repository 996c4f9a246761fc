use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use bigdecimal::BigDecimal;

use super::{CacheError, CacheStore};
use crate::utils::constants::{GAS_PRICE_KEY, PAIR_ADDRESS_PREFIX, TOKEN_DECIMALS_PREFIX};

/// Typed view over a [`CacheStore`].
///
/// Every cached value kind has its own accessor pair, so the key layout and
/// the string encoding of each kind live in one place.
#[derive(Clone)]
pub struct TypedCache {
    /// Underlying string store
    store: Arc<dyn CacheStore>,
}

impl TypedCache {
    /// Wraps a string store
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Key of the pair address for a swap from `from` to `to`
    #[must_use]
    pub fn pair_address_key(from: Address, to: Address) -> String {
        format!("{PAIR_ADDRESS_PREFIX}:{from}:{to}")
    }

    /// Key of a token's decimals
    #[must_use]
    pub fn decimals_key(token: Address) -> String {
        format!("{TOKEN_DECIMALS_PREFIX}:{token}")
    }

    /// Cached pair address for a swap from `from` to `to`.
    ///
    /// # Errors
    /// * `Backend` if the store cannot be reached
    /// * `Malformed` if the stored value is not an address
    pub async fn pair_address(
        &self,
        from: Address,
        to: Address,
    ) -> Result<Option<Address>, CacheError> {
        let key = Self::pair_address_key(from, to);
        self.read(&key, |raw| Address::from_str(raw).ok()).await
    }

    /// Caches the pair address for a swap from `from` to `to`.
    ///
    /// # Errors
    /// * `Backend` if the store cannot be reached
    pub async fn set_pair_address(
        &self,
        from: Address,
        to: Address,
        pair: Address,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let key = Self::pair_address_key(from, to);
        self.store.set(&key, &pair.to_string(), ttl).await
    }

    /// Cached decimals of `token`. A cached `0` is a hit.
    ///
    /// # Errors
    /// * `Backend` if the store cannot be reached
    /// * `Malformed` if the stored value is not an integer in 0..=255
    pub async fn decimals(&self, token: Address) -> Result<Option<u8>, CacheError> {
        let key = Self::decimals_key(token);
        self.read(&key, |raw| raw.parse::<u8>().ok()).await
    }

    /// Caches the decimals of `token`.
    ///
    /// # Errors
    /// * `Backend` if the store cannot be reached
    pub async fn set_decimals(
        &self,
        token: Address,
        decimals: u8,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let key = Self::decimals_key(token);
        self.store.set(&key, &decimals.to_string(), ttl).await
    }

    /// Cached gas price in gwei, as written by the refresh loop.
    ///
    /// # Errors
    /// * `Backend` if the store cannot be reached
    /// * `Malformed` if the stored value is not a decimal number
    pub async fn gas_price(&self) -> Result<Option<String>, CacheError> {
        self.read(GAS_PRICE_KEY, |raw| {
            BigDecimal::from_str(raw).ok().map(|_| raw.to_string())
        })
        .await
    }

    /// Overwrites the cached gas price.
    ///
    /// # Errors
    /// * `Backend` if the store cannot be reached
    pub async fn set_gas_price(&self, gwei: &str, ttl: Duration) -> Result<(), CacheError> {
        self.store.set(GAS_PRICE_KEY, gwei, ttl).await
    }

    /// Reads `key` and decodes it with `decode`.
    async fn read<T>(
        &self,
        key: &str,
        decode: impl Fn(&str) -> Option<T> + Send,
    ) -> Result<Option<T>, CacheError> {
        match self.store.get(key).await? {
            None => Ok(None),
            Some(raw) => decode(&raw).map(Some).ok_or(CacheError::Malformed {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}
