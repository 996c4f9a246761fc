use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use bigdecimal::num_bigint::Sign;
use bigdecimal::BigDecimal;
use log::{debug, warn};

use super::formula::get_amount_out;
use super::pair_address::PairAddressDerivation;
use super::reserves::ReserveFetcher;
use super::units::{format_units, parse_units};
use crate::cache::TypedCache;
use crate::error::{Error, Result, Stage};
use crate::models::{parse_token_address, AmountOut};

/// Answers amount-out queries.
///
/// Pair addresses and token decimals never change, so they are resolved
/// cache-aside: read the cache, on a miss compute / fetch and write back with
/// the long TTL. Reserves change every block and are always read live.
///
/// The cache is an optimization only. If it cannot be reached the value is
/// recomputed and the outage is logged.
#[derive(Clone)]
pub struct PricingOrchestrator {
    /// Typed cache of pair addresses and decimals
    cache: TypedCache,
    /// Live ledger reads
    fetcher: ReserveFetcher,
    /// Pair address derivation
    derivation: Arc<dyn PairAddressDerivation>,
    /// TTL of cached pair addresses and decimals
    token_data_ttl: Duration,
}

impl PricingOrchestrator {
    /// Creates an orchestrator.
    ///
    /// # Arguments
    /// * `cache` - Cache of pair addresses and decimals
    /// * `fetcher` - Ledger reads
    /// * `derivation` - Pair address derivation
    /// * `token_data_ttl` - TTL of cached pair addresses and decimals
    #[must_use]
    pub fn new(
        cache: TypedCache,
        fetcher: ReserveFetcher,
        derivation: Arc<dyn PairAddressDerivation>,
        token_data_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            fetcher,
            derivation,
            token_data_ttl,
        }
    }

    /// Parses a request and answers it.
    ///
    /// # Arguments
    /// * `from_token` - Address of the token sold
    /// * `to_token` - Address of the token bought
    /// * `amount_in` - Amount sold, in human units
    ///
    /// # Errors
    /// * `InvalidInput` naming the field if an argument is malformed
    /// * `ComputationFailed` naming the stage if the pipeline fails
    pub async fn quote(
        &self,
        from_token: &str,
        to_token: &str,
        amount_in: &str,
    ) -> Result<AmountOut> {
        let from_token = parse_token_address("fromToken", from_token)?;
        let to_token = parse_token_address("toToken", to_token)?;
        let amount_in = BigDecimal::from_str(amount_in.trim())
            .map_err(|e| Error::invalid_input("amountIn", e.to_string()))?;

        let amount_out = self.get_amount_out(from_token, to_token, &amount_in).await?;
        Ok(AmountOut {
            from_token,
            to_token,
            amount_in,
            amount_out,
        })
    }

    /// [`Self::quote`] bounded by a deadline.
    ///
    /// When the deadline passes the pipeline is dropped, which aborts the
    /// outstanding ledger calls. Cache writes completed before that stay.
    ///
    /// # Errors
    /// * `DataUnavailable` if the deadline passes
    /// * Any error of [`Self::quote`]
    pub async fn quote_within(
        &self,
        from_token: &str,
        to_token: &str,
        amount_in: &str,
        timeout: Duration,
    ) -> Result<AmountOut> {
        tokio::time::timeout(timeout, self.quote(from_token, to_token, amount_in))
            .await
            .map_err(|_| {
                Error::data_unavailable(
                    format!("quote {from_token}/{to_token}"),
                    format!("timed out after {timeout:?}"),
                )
            })?
    }

    /// Amount of `to_token` received for `amount_in` of `from_token`, in
    /// human units.
    ///
    /// # Errors
    /// * `InvalidInput` if the tokens are identical or the amount is not
    ///   positive or too precise for the token
    /// * `ComputationFailed` naming the stage for ledger and formula failures
    pub async fn get_amount_out(
        &self,
        from_token: Address,
        to_token: Address,
        amount_in: &BigDecimal,
    ) -> Result<String> {
        if from_token == to_token {
            return Err(Error::invalid_input(
                "toToken",
                format!("identical token addresses {from_token}"),
            ));
        }
        if amount_in.sign() != Sign::Plus {
            return Err(Error::invalid_input("amountIn", "must be positive"));
        }

        let pair_address = self
            .pair_address(from_token, to_token)
            .await
            .map_err(|e| e.at(Stage::PairAddress))?;

        let (reserves, decimals_in, decimals_out) = tokio::try_join!(
            async {
                self.fetcher
                    .get_reserves(from_token, to_token, pair_address)
                    .await
                    .map_err(|e| e.at(Stage::Reserves))
            },
            async {
                self.decimals(from_token)
                    .await
                    .map_err(|e| e.at(Stage::Decimals))
            },
            async {
                self.decimals(to_token)
                    .await
                    .map_err(|e| e.at(Stage::Decimals))
            },
        )?;

        let raw_in = parse_units(amount_in, decimals_in).map_err(|e| e.at(Stage::Conversion))?;
        let raw_out = get_amount_out(raw_in, reserves.reserve_in, reserves.reserve_out)
            .map_err(|e| e.at(Stage::Formula))?;
        let amount_out = format_units(raw_out, decimals_out);

        debug!(
            "pricing::orchestrator: {amount_in} {from_token} -> {amount_out} {to_token} \
             via {pair_address} (reserves {} / {})",
            reserves.reserve_in, reserves.reserve_out
        );
        Ok(amount_out)
    }

    /// Pair address for a swap from `from_token` to `to_token`, cache-aside.
    ///
    /// # Errors
    /// * `InvalidInput` if the tokens are identical
    pub async fn pair_address(&self, from_token: Address, to_token: Address) -> Result<Address> {
        match self.cache.pair_address(from_token, to_token).await {
            Ok(Some(pair)) => return Ok(pair),
            Ok(None) => {}
            Err(e) => warn!("pricing::orchestrator: Pair address cache read failed, deriving: {e}"),
        }

        let pair = self.derivation.derive_pair_address(from_token, to_token)?;
        if let Err(e) = self
            .cache
            .set_pair_address(from_token, to_token, pair, self.token_data_ttl)
            .await
        {
            warn!("pricing::orchestrator: Failed to cache pair address {pair}: {e}");
        }
        Ok(pair)
    }

    /// Decimals of `token`, cache-aside.
    ///
    /// # Errors
    /// * `DataUnavailable` if the token contract cannot be read
    pub async fn decimals(&self, token: Address) -> Result<u8> {
        match self.cache.decimals(token).await {
            Ok(Some(decimals)) => return Ok(decimals),
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "pricing::orchestrator: Decimals cache read failed for {token}, fetching: {e}"
                );
            }
        }

        let decimals = self.fetcher.get_decimals(token).await?;
        if let Err(e) = self
            .cache
            .set_decimals(token, decimals, self.token_data_ttl)
            .await
        {
            warn!("pricing::orchestrator: Failed to cache decimals of {token}: {e}");
        }
        Ok(decimals)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryCache};
    use crate::pricing::UniswapV2Derivation;
    use crate::test_helpers::{CountingDerivation, FailingCache, FakeLedger, TOKEN_A, TOKEN_B};

    const DAY: Duration = Duration::from_secs(86_400);

    struct Harness {
        ledger: Arc<FakeLedger>,
        derivation: Arc<CountingDerivation>,
        store: Arc<MemoryCache>,
        orchestrator: PricingOrchestrator,
    }

    fn harness_with(store: Arc<dyn CacheStore>, memory: Arc<MemoryCache>) -> Harness {
        let ledger = Arc::new(FakeLedger::default());
        let derivation = Arc::new(CountingDerivation::default());
        let orchestrator = PricingOrchestrator::new(
            TypedCache::new(store),
            ReserveFetcher::new(ledger.clone()),
            derivation.clone(),
            DAY,
        );
        Harness {
            ledger,
            derivation,
            store: memory,
            orchestrator,
        }
    }

    fn harness() -> Harness {
        let memory = Arc::new(MemoryCache::new());
        let h = harness_with(memory.clone(), memory);
        let pair = UniswapV2Derivation::default()
            .derive_pair_address(TOKEN_A, TOKEN_B)
            .unwrap();
        h.ledger.set_reserves(pair, 5_000_000, 10_000_000);
        h.ledger.set_decimals(TOKEN_A, 18);
        h.ledger.set_decimals(TOKEN_B, 18);
        h
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_pair_address_cache_aside() {
        let h = harness();
        let first = h.orchestrator.pair_address(TOKEN_A, TOKEN_B).await.unwrap();
        let second = h.orchestrator.pair_address(TOKEN_A, TOKEN_B).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(h.derivation.calls(), 1);
        assert_eq!(
            h.store
                .get(&TypedCache::pair_address_key(TOKEN_A, TOKEN_B))
                .await
                .unwrap(),
            Some(first.to_string())
        );
    }

    #[tokio::test]
    async fn test_decimals_cache_aside() {
        let h = harness();
        assert_eq!(h.orchestrator.decimals(TOKEN_A).await.unwrap(), 18);
        assert_eq!(h.orchestrator.decimals(TOKEN_A).await.unwrap(), 18);
        assert_eq!(h.ledger.decimals_calls(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let h = harness();
        let out = h
            .orchestrator
            .get_amount_out(TOKEN_A, TOKEN_B, &dec("100"))
            .await
            .unwrap();

        // 100e18 in against 5e6 / 1e7 drains nearly all of reserve_out
        let raw_out = parse_units(&dec(&out), 18).unwrap();
        let expected = get_amount_out(
            parse_units(&dec("100"), 18).unwrap(),
            alloy::primitives::U256::from(5_000_000u64),
            alloy::primitives::U256::from(10_000_000u64),
        )
        .unwrap();
        assert_eq!(raw_out, expected);
        assert!(dec(&out) > BigDecimal::from(0));
        assert!(raw_out < alloy::primitives::U256::from(10_000_000u64));
    }

    #[tokio::test]
    async fn test_reserves_are_never_cached() {
        let h = harness();
        for _ in 0..3 {
            h.orchestrator
                .get_amount_out(TOKEN_A, TOKEN_B, &dec("1"))
                .await
                .unwrap();
        }
        assert_eq!(h.ledger.reserves_calls(), 3);
        assert_eq!(h.ledger.decimals_calls(), 2);
        assert_eq!(h.derivation.calls(), 1);
    }

    #[tokio::test]
    async fn test_direction_matters() {
        let h = harness();
        h.ledger.set_decimals(TOKEN_B, 6);
        let pair = UniswapV2Derivation::default()
            .derive_pair_address(TOKEN_A, TOKEN_B)
            .unwrap();
        // 1000 A (18 decimals) : 2000 B (6 decimals)
        h.ledger
            .set_reserves(pair, 1_000 * 10u128.pow(18), 2_000 * 10u128.pow(6));

        let a_to_b = h
            .orchestrator
            .get_amount_out(TOKEN_A, TOKEN_B, &dec("1"))
            .await
            .unwrap();
        let b_to_a = h
            .orchestrator
            .get_amount_out(TOKEN_B, TOKEN_A, &dec("1"))
            .await
            .unwrap();
        // One A buys almost two B, one B buys almost half an A
        assert!(dec(&a_to_b) > dec("1.98") && dec(&a_to_b) < dec("2"));
        assert!(dec(&b_to_a) > dec("0.49") && dec(&b_to_a) < dec("0.5"));
    }

    #[tokio::test]
    async fn test_cache_outage_falls_back() {
        let h = harness_with(Arc::new(FailingCache), Arc::new(MemoryCache::new()));
        let pair = UniswapV2Derivation::default()
            .derive_pair_address(TOKEN_A, TOKEN_B)
            .unwrap();
        h.ledger.set_reserves(pair, 1_000_000, 1_000_000);
        h.ledger.set_decimals(TOKEN_A, 0);
        h.ledger.set_decimals(TOKEN_B, 0);

        let out = h
            .orchestrator
            .get_amount_out(TOKEN_A, TOKEN_B, &dec("1000"))
            .await
            .unwrap();
        assert_eq!(out, "996.0");
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let h = harness();
        let err = h
            .orchestrator
            .quote("0x1234", &TOKEN_B.to_string(), "1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "fromToken", .. }));

        let err = h
            .orchestrator
            .quote(&TOKEN_A.to_string(), &TOKEN_B.to_string(), "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "amountIn", .. }));

        let err = h
            .orchestrator
            .get_amount_out(TOKEN_A, TOKEN_B, &dec("0"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "amountIn", .. }));

        let err = h
            .orchestrator
            .get_amount_out(TOKEN_A, TOKEN_A, &dec("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "toToken", .. }));
        assert_eq!(h.derivation.calls(), 0);
    }

    #[tokio::test]
    async fn test_exponent_amounts_rejected_within_deadline() {
        let h = harness();
        for amount in ["1e20000000", "1e-20000000"] {
            let err = h
                .orchestrator
                .quote_within(
                    &TOKEN_A.to_string(),
                    &TOKEN_B.to_string(),
                    amount,
                    Duration::from_secs(1),
                )
                .await
                .unwrap_err();
            assert!(
                matches!(err, Error::InvalidInput { field: "amountIn", .. }),
                "{amount}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_ledger_failure_names_stage() {
        let h = harness();
        h.ledger.fail_calls(true);
        let err = h
            .orchestrator
            .get_amount_out(TOKEN_A, TOKEN_B, &dec("1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.stage(),
            Some(Stage::Reserves | Stage::Decimals)
        ));
        assert!(matches!(err.root(), Error::DataUnavailable { .. }));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_empty_pool() {
        let h = harness();
        let pair = UniswapV2Derivation::default()
            .derive_pair_address(TOKEN_A, TOKEN_B)
            .unwrap();
        h.ledger.set_reserves(pair, 0, 0);
        let err = h
            .orchestrator
            .get_amount_out(TOKEN_A, TOKEN_B, &dec("1"))
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Formula));
        assert!(matches!(err.root(), Error::InsufficientLiquidity));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_quote_within_times_out() {
        let h = harness();
        h.ledger.set_delay(Duration::from_secs(5));
        let err = h
            .orchestrator
            .quote_within(
                &TOKEN_A.to_string(),
                &TOKEN_B.to_string(),
                "1",
                Duration::from_millis(50),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
        // The pair address was cached before the ledger stalled
        assert_eq!(h.derivation.calls(), 1);
        assert!(h
            .store
            .get(&TypedCache::pair_address_key(TOKEN_A, TOKEN_B))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_quote_record() {
        let h = harness();
        let quote = h
            .orchestrator
            .quote(&TOKEN_A.to_string(), &TOKEN_B.to_string(), "100")
            .await
            .unwrap();
        assert_eq!(quote.from_token, TOKEN_A);
        assert_eq!(quote.to_token, TOKEN_B);
        assert_eq!(quote.amount_in, dec("100"));
        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("amountOut").is_some());
        assert!(json.get("fromToken").is_some());
    }
}
