use alloy::primitives::{address, b256, Address, B256};

/// Uniswap V2 factory on Ethereum mainnet
pub const UNISWAP_V2_FACTORY: Address = address!("0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");
/// Keccak hash of the Uniswap V2 pair creation code
pub const UNISWAP_V2_INIT_CODE_HASH: B256 =
    b256!("0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

/// Cache key prefix of pair addresses: `pairAddress:{from}:{to}`
pub const PAIR_ADDRESS_PREFIX: &str = "pairAddress";
/// Cache key prefix of token decimals: `tokenDecimals:{token}`
pub const TOKEN_DECIMALS_PREFIX: &str = "tokenDecimals";
/// Cache key of the gas price
pub const GAS_PRICE_KEY: &str = "gasPrice";

/// Queue carrying gas price refresh signals
pub const GAS_PRICE_QUEUE: &str = "gas-price-update";

/// TTL of pair addresses and decimals, in seconds
pub const TOKEN_DATA_TTL_SECS: u64 = 24 * 60 * 60;
/// TTL of the cached gas price, in seconds
pub const GAS_PRICE_TTL_SECS: u64 = 60;
/// Interval of the gas price refresh timer, in seconds
pub const GAS_PRICE_REFRESH_SECS: u64 = 7;

/// Decimals of gwei relative to wei
pub const GWEI_DECIMALS: u8 = 9;
