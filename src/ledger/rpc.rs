use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    sol,
};
use async_trait::async_trait;
use tokio::sync::Semaphore;
use url::Url;

use super::{LedgerError, LedgerGateway};

// UniswapV2Pair interface, only the reserves getter is needed.
sol! {
    #[sol(rpc)]
    interface IUniswapV2Pair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }
}

// ERC20 interface, only the decimals getter is needed.
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function decimals() external view returns (uint8);
    }
}

/// Ledger gateway backed by an HTTP JSON-RPC provider.
///
/// The upstream provider is rate limited, so the number of calls in flight is
/// bounded by a semaphore and every call is given a deadline.
#[derive(Clone)]
pub struct RpcLedger {
    /// Remote provider
    provider: RootProvider<Ethereum>,
    /// Permits for outbound calls
    permits: Arc<Semaphore>,
    /// Deadline of a single call
    timeout: Duration,
}

impl RpcLedger {
    /// Creates a gateway for the given endpoint.
    ///
    /// # Arguments
    /// * `rpc_url` - HTTP JSON-RPC endpoint
    /// * `max_concurrent_calls` - Upper bound of calls in flight (at least 1)
    /// * `timeout` - Deadline of a single call
    #[must_use]
    pub fn new(rpc_url: Url, max_concurrent_calls: usize, timeout: Duration) -> Self {
        let provider = ProviderBuilder::new().on_http(rpc_url);
        Self {
            provider: (*provider.root()).clone(),
            permits: Arc::new(Semaphore::new(max_concurrent_calls.max(1))),
            timeout,
        }
    }

    /// Runs `call` once a permit is available, within the call deadline.
    async fn bounded<T, F>(&self, call: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>> + Send,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| LedgerError::Rpc(e.to_string()))?;
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| LedgerError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl LedgerGateway for RpcLedger {
    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), LedgerError> {
        self.bounded(async {
            let reserves = IUniswapV2Pair::new(pair, &self.provider)
                .getReserves()
                .call()
                .await
                .map_err(|e| LedgerError::Contract {
                    address: pair,
                    reason: e.to_string(),
                })?;
            log::debug!(
                "ledger::rpc: reserves of {pair}: {} / {}",
                reserves.reserve0,
                reserves.reserve1
            );
            Ok((U256::from(reserves.reserve0), U256::from(reserves.reserve1)))
        })
        .await
    }

    async fn get_decimals(&self, token: Address) -> Result<u8, LedgerError> {
        self.bounded(async {
            let decimals = IERC20::new(token, &self.provider)
                .decimals()
                .call()
                .await
                .map_err(|e| LedgerError::Contract {
                    address: token,
                    reason: e.to_string(),
                })?
                ._0;
            Ok(decimals)
        })
        .await
    }

    async fn get_gas_price(&self) -> Result<U256, LedgerError> {
        self.bounded(async {
            let wei = self
                .provider
                .get_gas_price()
                .await
                .map_err(|e| LedgerError::Rpc(e.to_string()))?;
            Ok(U256::from(wei))
        })
        .await
    }
}
