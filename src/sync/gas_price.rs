use std::sync::Arc;
use std::time::Duration;

use crate::cache::TypedCache;
use crate::error::{Error, Result};
use crate::ledger::LedgerGateway;
use crate::models::GasPrice;
use crate::pricing::format_units;
use crate::utils::constants::GWEI_DECIMALS;

/// Keeps the cached gas price fresh and serves reads of it.
///
/// Both refresh triggers (timer and broker) call [`Self::refresh_gas_price`].
/// A refresh is a plain overwrite of one key, so concurrent or redundant
/// refreshes are harmless.
#[derive(Clone)]
pub struct GasPriceSync {
    /// Chain access
    ledger: Arc<dyn LedgerGateway>,
    /// Gas price cache
    cache: TypedCache,
    /// TTL of the cached gas price
    ttl: Duration,
}

impl GasPriceSync {
    /// Creates the gas price sync.
    ///
    /// # Arguments
    /// * `ledger` - Source of the gas price
    /// * `cache` - Where the gas price is kept
    /// * `ttl` - TTL of the cached gas price
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerGateway>, cache: TypedCache, ttl: Duration) -> Self {
        Self { ledger, cache, ttl }
    }

    /// Reads the network gas price and overwrites the cached one.
    ///
    /// # Returns
    /// The gas price written, in gwei
    ///
    /// # Errors
    /// * `DataUnavailable` if the gas price cannot be read
    /// * `CacheUnavailable` if it cannot be written
    pub async fn refresh_gas_price(&self) -> Result<String> {
        let wei = self
            .ledger
            .get_gas_price()
            .await
            .map_err(|e| Error::data_unavailable("gas price", e))?;
        let gwei = format_units(wei, GWEI_DECIMALS);

        self.cache.set_gas_price(&gwei, self.ttl).await?;
        log::info!("sync::gas_price: Fetched gas price: {gwei} gwei");
        Ok(gwei)
    }

    /// [`Self::refresh_gas_price`] for the triggers: a failure is logged and
    /// the next trigger tries again.
    pub async fn refresh_logged(&self) {
        if let Err(e) = self.refresh_gas_price().await {
            log::error!("sync::gas_price: Error fetching or setting gas price: {e}");
        }
    }

    /// The cached gas price.
    ///
    /// The cache is the only store of the gas price, so an empty or
    /// unreachable cache means there is no answer.
    ///
    /// # Errors
    /// * `DataUnavailable` if the gas price is not cached or the cache cannot
    ///   be reached
    pub async fn cached_gas_price(&self) -> Result<GasPrice> {
        match self.cache.gas_price().await {
            Ok(Some(gas_price)) => Ok(GasPrice { gas_price }),
            Ok(None) => Err(Error::data_unavailable("gas price", "not available in cache")),
            Err(e) => {
                log::error!("sync::gas_price: Error retrieving gas price from cache: {e}");
                Err(Error::data_unavailable("gas price", e))
            }
        }
    }
}
