//! Raw REST payload shapes, exactly as the fullnode serves them.
//!
//! Everything numeric arrives string-encoded (the node renders u64/u128 as
//! JSON strings); decoding to typed values happens in `normalize`.

use serde::Deserialize;

/// One entry from the contract's event-handle endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEventEnvelope {
    /// Ledger version at which the event was committed.
    pub version: String,
    /// Per-handle monotonic sequence number, string-encoded.
    pub sequence_number: String,
    /// Fully qualified event struct tag, e.g. `0xc0ffee::market::BuyEvent`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: RawTradePayload,
}

/// The `data` field of a trade-creation event.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTradePayload {
    /// Address of the account that placed the order.
    pub user: String,
    /// Symbol bytes as emitted: hex-encoded (optionally `0x`-prefixed) or a
    /// plain string, possibly NUL-padded to a fixed width.
    pub ticker: String,
    /// Quote amount, unscaled integer string (6 implied decimals).
    pub usdc_amount: String,
    /// Asset amount, unscaled integer string (18 implied decimals).
    pub asset_amount: String,
    /// Average fill price, unscaled integer string (18 implied decimals).
    pub avg_price: String,
    /// Event timestamp as epoch microseconds, string-encoded.
    pub timestamp_us: String,
}
