use std::sync::Arc;

use alloy::primitives::Address;

use crate::error::{Error, Result};
use crate::ledger::LedgerGateway;
use crate::models::{Reserves, TokenPair};

/// Reads reserves and decimals from the ledger.
///
/// Nothing is cached here and nothing is retried: a failed ledger call is
/// reported as `DataUnavailable` carrying the token / pair it was made for.
#[derive(Clone)]
pub struct ReserveFetcher {
    /// Chain access
    ledger: Arc<dyn LedgerGateway>,
}

impl ReserveFetcher {
    /// Creates a fetcher reading through `ledger`
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerGateway>) -> Self {
        Self { ledger }
    }

    /// Live reserves of `pair_address`, oriented to a swap from `from_token`
    /// to `to_token`.
    ///
    /// The pair contract reports `(reserve0, reserve1)` in canonical token
    /// order. They are swapped when `from_token` is the pair's `token1`.
    ///
    /// # Errors
    /// * `InvalidInput` if both tokens are identical
    /// * `DataUnavailable` if the ledger call fails
    pub async fn get_reserves(
        &self,
        from_token: Address,
        to_token: Address,
        pair_address: Address,
    ) -> Result<Reserves> {
        let pair = TokenPair::new(from_token, to_token)?;
        let (reserve0, reserve1) = self.ledger.get_reserves(pair_address).await.map_err(|e| {
            Error::data_unavailable(
                format!("reserves of pair {pair_address} ({from_token}/{to_token})"),
                e,
            )
        })?;
        Ok(Reserves::oriented(&pair, from_token, reserve0, reserve1))
    }

    /// Decimals of `token`, read from its contract.
    ///
    /// # Errors
    /// * `DataUnavailable` if the ledger call fails
    pub async fn get_decimals(&self, token: Address) -> Result<u8> {
        self.ledger
            .get_decimals(token)
            .await
            .map_err(|e| Error::data_unavailable(format!("decimals of token {token}"), e))
    }
}
