//! Service configuration read from the environment.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{Address, B256};
use eyre::{eyre, Result};
use url::Url;

use crate::utils::constants::{
    GAS_PRICE_QUEUE, GAS_PRICE_REFRESH_SECS, GAS_PRICE_TTL_SECS, TOKEN_DATA_TTL_SECS,
    UNISWAP_V2_FACTORY, UNISWAP_V2_INIT_CODE_HASH,
};

/// RPC endpoint used when none is configured (tests, local nodes)
const LOCAL_RPC_URL: &str = "http://localhost:8545";

/// Runtime configuration of the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP JSON-RPC endpoint
    pub rpc_url: String,
    /// Redis URL, in-process cache when absent
    pub cache_url: Option<String>,
    /// AMQP URL, in-process broker when absent
    pub broker_url: Option<String>,
    /// Uniswap V2 factory
    pub factory: Address,
    /// Keccak hash of the pair creation code
    pub init_code_hash: B256,
    /// Queue carrying gas price refresh signals
    pub gas_price_queue: String,
    /// Period of the gas price refresh timer
    pub gas_price_refresh: Duration,
    /// Period of the refresh signal publisher
    pub gas_price_publish: Duration,
    /// TTL of the cached gas price
    pub gas_price_ttl: Duration,
    /// TTL of cached pair addresses and decimals
    pub token_data_ttl: Duration,
    /// Upper bound of RPC calls in flight
    pub rpc_max_concurrent_calls: usize,
    /// Deadline of a single RPC call
    pub rpc_timeout: Duration,
    /// Deadline of a whole quote
    pub quote_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: LOCAL_RPC_URL.to_string(),
            cache_url: None,
            broker_url: None,
            factory: UNISWAP_V2_FACTORY,
            init_code_hash: UNISWAP_V2_INIT_CODE_HASH,
            gas_price_queue: GAS_PRICE_QUEUE.to_string(),
            gas_price_refresh: Duration::from_secs(GAS_PRICE_REFRESH_SECS),
            gas_price_publish: Duration::from_secs(GAS_PRICE_REFRESH_SECS),
            gas_price_ttl: Duration::from_secs(GAS_PRICE_TTL_SECS),
            token_data_ttl: Duration::from_secs(TOKEN_DATA_TTL_SECS),
            rpc_max_concurrent_calls: 8,
            rpc_timeout: Duration::from_secs(10),
            quote_timeout: Duration::from_secs(15),
        }
    }
}

impl Config {
    /// Loads `.env` if present and reads the configuration from the
    /// environment.
    ///
    /// # Environment Variables
    /// * `RPC_URL` - HTTP JSON-RPC endpoint (required)
    /// * `CACHE_URL` - Redis URL (optional)
    /// * `BROKER_URL` - AMQP URL (optional)
    /// * `UNISWAP_V2_FACTORY`, `UNISWAP_V2_INIT_CODE_HASH` - Pair derivation constants
    /// * `GAS_PRICE_QUEUE` - Refresh signal queue
    /// * `GAS_PRICE_REFRESH_SECS`, `GAS_PRICE_PUBLISH_SECS`, `GAS_PRICE_TTL_SECS`,
    ///   `TOKEN_DATA_TTL_SECS`, `RPC_TIMEOUT_SECS`, `QUOTE_TIMEOUT_SECS` - Durations
    /// * `RPC_MAX_CONCURRENT_CALLS` - Upper bound of RPC calls in flight
    ///
    /// # Errors
    /// * If `RPC_URL` is not set
    /// * If a variable is set to a malformed value
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    ///
    /// # Errors
    /// * If `RPC_URL` is not set
    /// * If a variable is set to a malformed value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let rpc_url = lookup("RPC_URL").ok_or_else(|| eyre!("RPC_URL must be set"))?;
        Url::parse(&rpc_url).map_err(|e| eyre!("RPC_URL is not a valid URL: {e}"))?;

        Ok(Self {
            rpc_url,
            cache_url: lookup("CACHE_URL"),
            broker_url: lookup("BROKER_URL"),
            factory: parsed(&lookup, "UNISWAP_V2_FACTORY", defaults.factory)?,
            init_code_hash: parsed(&lookup, "UNISWAP_V2_INIT_CODE_HASH", defaults.init_code_hash)?,
            gas_price_queue: lookup("GAS_PRICE_QUEUE").unwrap_or(defaults.gas_price_queue),
            gas_price_refresh: seconds(
                &lookup,
                "GAS_PRICE_REFRESH_SECS",
                defaults.gas_price_refresh,
            )?,
            gas_price_publish: seconds(
                &lookup,
                "GAS_PRICE_PUBLISH_SECS",
                defaults.gas_price_publish,
            )?,
            gas_price_ttl: seconds(&lookup, "GAS_PRICE_TTL_SECS", defaults.gas_price_ttl)?,
            token_data_ttl: seconds(&lookup, "TOKEN_DATA_TTL_SECS", defaults.token_data_ttl)?,
            rpc_max_concurrent_calls: parsed(
                &lookup,
                "RPC_MAX_CONCURRENT_CALLS",
                defaults.rpc_max_concurrent_calls,
            )?,
            rpc_timeout: seconds(&lookup, "RPC_TIMEOUT_SECS", defaults.rpc_timeout)?,
            quote_timeout: seconds(&lookup, "QUOTE_TIMEOUT_SECS", defaults.quote_timeout)?,
        })
    }
}

/// Value of `name` parsed as `T`, or `default` when unset
fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    lookup(name).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| eyre!("{name} has an invalid value {raw:?}: {e}"))
    })
}

/// Value of `name` as a non-zero number of seconds, or `default` when unset
fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: Duration,
) -> Result<Duration> {
    let secs: u64 = parsed(lookup, name, default.as_secs())?;
    if secs == 0 {
        return Err(eyre!("{name} must be at least 1 second"));
    }
    Ok(Duration::from_secs(secs))
}
