/// Token pairs, canonical ordering and reserves
pub mod pair;
/// Records returned by the public read surface
pub mod quote;
/// Token address parsing
pub mod token;

pub use pair::{Reserves, TokenPair};
pub use quote::{AmountOut, GasPrice};
pub use token::parse_token_address;
