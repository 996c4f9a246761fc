use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use serde::Serialize;

/// Answer to an amount-out query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountOut {
    /// Token being sold
    pub from_token: Address,
    /// Token being bought
    pub to_token: Address,
    /// Amount sold, in human units of `from_token`
    pub amount_in: BigDecimal,
    /// Amount bought, in human units of `to_token`
    pub amount_out: String,
}

/// Current network gas price as cached by the refresh loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPrice {
    /// Gas price in gwei
    pub gas_price: String,
}
