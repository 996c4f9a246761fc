//! Application context for managing the service's external connections.
//!
//! This module wires the collaborators of the pricing core from a
//! [`Config`]:
//! - the ledger (HTTP JSON-RPC provider)
//! - the cache (Redis, or in-process when no URL is configured)
//! - the message broker (RabbitMQ, or in-process when no URL is configured)

use std::sync::Arc;

use eyre::{Error, Result};
use url::Url;

use crate::broker::{AmqpBroker, MemoryBroker, MessageBroker};
use crate::cache::{CacheStore, MemoryCache, RedisCache, TypedCache};
use crate::config::Config;
use crate::ledger::{LedgerGateway, RpcLedger};
use crate::pricing::{PricingOrchestrator, ReserveFetcher, UniswapV2Derivation};
use crate::sync::GasPriceSync;

/// Application context holding the shared collaborators.
#[derive(Clone)]
pub struct AppContext {
    /// Service configuration
    pub config: Config,
    /// Ledger gateway
    pub ledger: Arc<dyn LedgerGateway>,
    /// Cache store
    pub cache: Arc<dyn CacheStore>,
    /// Message broker
    pub broker: Arc<dyn MessageBroker>,
}

impl AppContext {
    /// Connects every collaborator named by `config`.
    ///
    /// # Returns
    /// * `Result<Self, Error>` - The initialized context or an error
    ///
    /// # Errors
    /// * If the RPC URL is invalid
    /// * If the cache or the broker cannot be reached
    pub async fn new(config: Config) -> Result<Self, Error> {
        let ledger = Self::ledger(&config)?;

        let cache: Arc<dyn CacheStore> = match &config.cache_url {
            Some(url) => Arc::new(RedisCache::connect(url).await?),
            None => {
                log::warn!("utils::app_context: CACHE_URL not set, using in-process cache");
                Arc::new(MemoryCache::new())
            }
        };

        let broker: Arc<dyn MessageBroker> = match &config.broker_url {
            Some(url) => Arc::new(AmqpBroker::connect(url).await?),
            None => {
                log::warn!("utils::app_context: BROKER_URL not set, using in-process broker");
                Arc::new(MemoryBroker::new())
            }
        };

        Ok(Self::with_parts(config, ledger, cache, broker))
    }

    /// Assembles a context from already built collaborators
    #[must_use]
    pub fn with_parts(
        config: Config,
        ledger: Arc<dyn LedgerGateway>,
        cache: Arc<dyn CacheStore>,
        broker: Arc<dyn MessageBroker>,
    ) -> Self {
        Self {
            config,
            ledger,
            cache,
            broker,
        }
    }

    /// Creates the ledger gateway for the configured RPC endpoint.
    ///
    /// # Errors
    /// * If URL parsing fails
    pub fn ledger(config: &Config) -> Result<Arc<dyn LedgerGateway>, Error> {
        let url = Url::parse(&config.rpc_url)?;
        Ok(Arc::new(RpcLedger::new(
            url,
            config.rpc_max_concurrent_calls,
            config.rpc_timeout,
        )))
    }

    /// Amount-out pipeline over this context's collaborators
    #[must_use]
    pub fn orchestrator(&self) -> PricingOrchestrator {
        PricingOrchestrator::new(
            TypedCache::new(self.cache.clone()),
            ReserveFetcher::new(self.ledger.clone()),
            Arc::new(UniswapV2Derivation::new(
                self.config.factory,
                self.config.init_code_hash,
            )),
            self.config.token_data_ttl,
        )
    }

    /// Gas price refresh over this context's collaborators
    #[must_use]
    pub fn gas_price_sync(&self) -> GasPriceSync {
        GasPriceSync::new(
            self.ledger.clone(),
            TypedCache::new(self.cache.clone()),
            self.config.gas_price_ttl,
        )
    }
}
