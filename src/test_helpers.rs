#![allow(clippy::unwrap_used, clippy::missing_docs_in_private_items, missing_docs)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::primitives::{address, Address, U256};
use async_trait::async_trait;

use crate::cache::{CacheError, CacheStore};
use crate::error::Result;
use crate::ledger::{LedgerError, LedgerGateway};
use crate::pricing::{PairAddressDerivation, UniswapV2Derivation};

pub const TOKEN_A: Address = address!("0x1000000000000000000000000000000000000001");
pub const TOKEN_B: Address = address!("0x2000000000000000000000000000000000000002");

/// Scripted ledger with call counters
#[derive(Default)]
pub struct FakeLedger {
    reserves: Mutex<HashMap<Address, (U256, U256)>>,
    decimals: Mutex<HashMap<Address, u8>>,
    gas_price: Mutex<U256>,
    delay: Mutex<Option<Duration>>,
    fail: AtomicBool,
    reserves_calls: AtomicUsize,
    decimals_calls: AtomicUsize,
    gas_price_calls: AtomicUsize,
}

impl FakeLedger {
    pub fn set_reserves(&self, pair: Address, reserve0: u128, reserve1: u128) {
        self.reserves
            .lock()
            .unwrap()
            .insert(pair, (U256::from(reserve0), U256::from(reserve1)));
    }

    pub fn set_decimals(&self, token: Address, decimals: u8) {
        self.decimals.lock().unwrap().insert(token, decimals);
    }

    pub fn set_gas_price(&self, wei: u128) {
        *self.gas_price.lock().unwrap() = U256::from(wei);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_calls(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn reserves_calls(&self) -> usize {
        self.reserves_calls.load(Ordering::SeqCst)
    }

    pub fn decimals_calls(&self) -> usize {
        self.decimals_calls.load(Ordering::SeqCst)
    }

    pub fn gas_price_calls(&self) -> usize {
        self.gas_price_calls.load(Ordering::SeqCst)
    }

    async fn before_call(&self) -> Result<(), LedgerError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(LedgerError::Rpc("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerGateway for FakeLedger {
    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), LedgerError> {
        self.reserves_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        let reserves = self.reserves.lock().unwrap().get(&pair).copied();
        reserves.ok_or(LedgerError::Contract {
            address: pair,
            reason: "execution reverted".to_string(),
        })
    }

    async fn get_decimals(&self, token: Address) -> Result<u8, LedgerError> {
        self.decimals_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        let decimals = self.decimals.lock().unwrap().get(&token).copied();
        decimals.ok_or(LedgerError::Contract {
            address: token,
            reason: "execution reverted".to_string(),
        })
    }

    async fn get_gas_price(&self) -> Result<U256, LedgerError> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        Ok(*self.gas_price.lock().unwrap())
    }
}

/// Uniswap V2 derivation counting its invocations
#[derive(Default)]
pub struct CountingDerivation {
    inner: UniswapV2Derivation,
    calls: AtomicUsize,
}

impl CountingDerivation {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PairAddressDerivation for CountingDerivation {
    fn derive_pair_address(&self, token_a: Address, token_b: Address) -> Result<Address> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.derive_pair_address(token_a, token_b)
    }
}

/// Cache store that is never reachable
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }
}
