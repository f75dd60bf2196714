//! Shared domain types for the supply-bridge workspace.
//!
//! Plain data only: trade events as normalized from the ledger, the dedup
//! identity derived from them, mint/burn transaction outcomes, and the row
//! shape persisted by sbr-db. No I/O, no policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TradeKind
// ---------------------------------------------------------------------------

/// Which side of the market emitted the event.
///
/// Serialized as `"BUY"` / `"SELL"` both on the wire and in the
/// `processed_trades.trade_kind` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeKind {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Buy => "BUY",
            TradeKind::Sell => "SELL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(TradeKind::Buy),
            "SELL" => Some(TradeKind::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TokenSymbol
// ---------------------------------------------------------------------------

/// The closed set of token classes this service may mint or burn.
///
/// [`TokenSymbol::from_ticker`] is the single mapping from decoded ticker
/// strings into this set. A ticker that does not map here must never reach
/// the supply controller; the engine records it as unsupported instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenSymbol {
    Usd,
    Usdc,
    Lqd,
    Tsla,
    Aapl,
}

impl TokenSymbol {
    /// Exact, case-insensitive ticker match against the closed set.
    pub fn from_ticker(ticker: &str) -> Option<Self> {
        match ticker.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(TokenSymbol::Usd),
            "USDC" => Some(TokenSymbol::Usdc),
            "LQD" => Some(TokenSymbol::Lqd),
            "TSLA" => Some(TokenSymbol::Tsla),
            "AAPL" => Some(TokenSymbol::Aapl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSymbol::Usd => "USD",
            TokenSymbol::Usdc => "USDC",
            TokenSymbol::Lqd => "LQD",
            TokenSymbol::Tsla => "TSLA",
            TokenSymbol::Aapl => "AAPL",
        }
    }
}

impl std::fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TradeId
// ---------------------------------------------------------------------------

/// Dedup identity of a logical trade event.
///
/// `(account_address, kind, sequence_number)`. The sequence number is
/// monotonic per account on the ledger, so two fetches of the same event
/// always derive an equal `TradeId`. This tuple is the sole idempotency
/// boundary; `processed_trades` carries a unique constraint over it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeId {
    pub account_address: String,
    pub kind: TradeKind,
    /// Kept string-encoded: the ledger emits unbounded-width integers.
    pub sequence_number: String,
}

impl std::fmt::Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.account_address, self.kind, self.sequence_number
        )
    }
}

// ---------------------------------------------------------------------------
// TradeEvent
// ---------------------------------------------------------------------------

/// A normalized trade-creation event, immutable once produced.
///
/// Amounts stay in their original unscaled integer form (decimal strings) so
/// nothing downstream can lose precision; display scaling happens only in
/// logs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub kind: TradeKind,
    /// Ledger account that initiated the trade.
    pub account_address: String,
    /// Per-account monotonic sequence number, string-encoded.
    pub sequence_number: String,
    /// Symbol bytes exactly as the ledger emitted them (hex or plain).
    pub ticker_raw: String,
    /// Decoded, NUL-stripped ticker; equals `ticker_raw` when decoding failed.
    pub ticker: String,
    /// Quote amount, unscaled integer string (6 implied decimals).
    pub usdc_amount: String,
    /// Asset amount, unscaled integer string (18 implied decimals).
    pub asset_amount: String,
    /// Average price, unscaled integer string (18 implied decimals).
    pub price: String,
    /// Ledger version at which the event was committed.
    pub ledger_version: String,
    pub occurred_at: DateTime<Utc>,
}

impl TradeEvent {
    pub fn trade_id(&self) -> TradeId {
        TradeId {
            account_address: self.account_address.clone(),
            kind: self.kind,
            sequence_number: self.sequence_number.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// TxOutcome
// ---------------------------------------------------------------------------

/// Result of one submitted ledger transaction (mint, burn, allowlist set).
///
/// Terminal per event per cycle: the engine never resubmits a failed
/// outcome beyond the single allowlist auto-remediation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub success: bool,
    pub gas_used: Option<u64>,
    pub error_message: Option<String>,
}

impl TxOutcome {
    /// The failure detail, or a fixed placeholder when the ledger gave none.
    pub fn error_text(&self) -> &str {
        self.error_message
            .as_deref()
            .unwrap_or("transaction failed without error message")
    }
}

// ---------------------------------------------------------------------------
// NewProcessedTrade
// ---------------------------------------------------------------------------

/// Row inserted into `processed_trades`, created exactly once per [`TradeId`]
/// and never updated or deleted by this service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProcessedTrade {
    pub id: Uuid,
    pub account_address: String,
    pub trade_kind: TradeKind,
    pub sequence_number: String,
    pub ticker_raw: String,
    pub ticker: String,
    /// Exact unscaled integer string as fetched; never the display value.
    pub usdc_amount: String,
    pub asset_amount: String,
    pub price: String,
    pub ledger_version: String,
    pub occurred_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
}

impl NewProcessedTrade {
    pub fn from_event(ev: &TradeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_address: ev.account_address.clone(),
            trade_kind: ev.kind,
            sequence_number: ev.sequence_number.clone(),
            ticker_raw: ev.ticker_raw.clone(),
            ticker: ev.ticker.clone(),
            usdc_amount: ev.usdc_amount.clone(),
            asset_amount: ev.asset_amount.clone(),
            price: ev.price.clone(),
            ledger_version: ev.ledger_version.clone(),
            occurred_at: ev.occurred_at,
            processed_at: Utc::now(),
        }
    }

    pub fn trade_id(&self) -> TradeId {
        TradeId {
            account_address: self.account_address.clone(),
            kind: self.trade_kind,
            sequence_number: self.sequence_number.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
