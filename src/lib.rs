/*!
 * # Quoter - Uniswap V2 Pricing Service
 *
 * Quoter answers two questions about a Uniswap V2 style exchange: the current
 * network gas price and the expected output amount of a swap. Both need remote
 * ledger reads, so derived facts are cached and the gas price is kept warm by a
 * background refresh loop.
 *
 * ## Core Features
 *
 * - **Pair Address Derivation**: CREATE2 derivation of pair addresses, no ledger read
 * - **Swap Quotes**: Constant-product amount out with the 0.3% fee over 256-bit integers
 * - **Cache-Aside Token Data**: Pair addresses and decimals cached for a day
 * - **Gas Price Refresh**: Timer and message broker triggers sharing one idempotent refresh
 *
 * ## Module Structure
 *
 * - `broker`: Message broker carrying refresh signals
 * - `cache`: Key/value cache with TTL and typed accessors
 * - `config`: Configuration read from the environment
 * - `core`: Start / stop of the background refresh
 * - `error`: Error taxonomy of the pricing core
 * - `ledger`: Remote ledger reads
 * - `models`: Data models for the application
 * - `pricing`: Pair derivation, swap formula and the amount-out pipeline
 * - `sync`: Gas price refresh loop
 * - `utils`: Utility functions and helpers
 */

/// Message broker carrying refresh signals
pub mod broker;
/// Key/value cache with TTL
pub mod cache;
/// Configuration read from the environment
pub mod config;
/// Start / stop of the background refresh
pub mod core;
/// Error taxonomy of the pricing core
pub mod error;
/// Remote ledger reads
pub mod ledger;
/// Data models for the application
pub mod models;
/// Pair derivation, swap formula and the amount-out pipeline
pub mod pricing;
/// Gas price refresh loop
pub mod sync;
/// Utility functions and helpers
pub mod utils;

#[cfg(test)]
mod test_helpers;
