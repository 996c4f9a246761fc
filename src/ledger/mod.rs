//! Access to on-chain state.
//!
//! The pricing core only needs three reads from the chain: the raw reserves
//! of a pair contract, the decimals of a token contract and the current gas
//! price. [`LedgerGateway`] is the seam between the core and the JSON-RPC
//! endpoint, [`RpcLedger`] is the production implementation.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

/// JSON-RPC backed gateway
pub mod rpc;

pub use rpc::RpcLedger;

/// Errors raised by a ledger gateway
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Transport or node failure
    #[error("rpc call failed: {0}")]
    Rpc(String),
    /// The call did not answer in time
    #[error("rpc call timed out after {0:?}")]
    Timeout(std::time::Duration),
    /// The contract reverted or returned something undecodable
    #[error("contract call to {address} failed: {reason}")]
    Contract {
        /// Contract that was called
        address: Address,
        /// Revert or decoding failure
        reason: String,
    },
}

/// Read-only view of the chain used by the pricing core.
///
/// Implementations never retry; retry policy belongs to the caller.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Raw `(reserve0, reserve1)` of a pair contract, in the contract's own
    /// token order.
    ///
    /// # Errors
    /// * If the call fails, reverts or cannot be decoded
    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), LedgerError>;

    /// `decimals()` of a token contract.
    ///
    /// # Errors
    /// * If the call fails, reverts or cannot be decoded
    async fn get_decimals(&self, token: Address) -> Result<u8, LedgerError>;

    /// Current network gas price in wei.
    ///
    /// # Errors
    /// * If the call fails
    async fn get_gas_price(&self) -> Result<U256, LedgerError>;
}
