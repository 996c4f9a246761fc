//! # Pricing
//!
//! Amount-out computation for Uniswap V2 style pairs: pair address
//! derivation, live reserve reads, the constant-product formula and the
//! orchestration that ties them to the cache.

/// Constant-product formula
pub mod formula;
/// Amount-out pipeline
pub mod orchestrator;
/// Pair address derivation
pub mod pair_address;
/// Reserve and decimals reads
pub mod reserves;
/// Unit conversion
pub mod units;

pub use formula::get_amount_out;
pub use orchestrator::PricingOrchestrator;
pub use pair_address::{PairAddressDerivation, UniswapV2Derivation};
pub use reserves::ReserveFetcher;
pub use units::{format_units, parse_units};
