//! Port traits for the three ledger-side collaborators.
//!
//! Implementations must be object-safe (`Box<dyn Trait>` / `Arc<dyn Trait>`)
//! and `Send + Sync` so the engine can hold them across await points. The
//! production implementation is [`crate::LedgerRestClient`]; tests use the
//! scripted fakes in sbr-testkit.

use async_trait::async_trait;
use sbr_schemas::{TokenSymbol, TradeEvent, TradeKind, TxOutcome};

use crate::ChainError;

/// Bounded page of recent trade-creation events for the watched contract.
///
/// # Contract
/// Events are returned in ascending sequence-number order (chronological).
/// The feed is a fixed trailing window, not a cursor: pages may repeat
/// events already seen in earlier cycles, and callers own deduplication.
#[async_trait]
pub trait TradeFeed: Send + Sync {
    async fn fetch_trades(
        &self,
        kind: TradeKind,
        limit: u16,
    ) -> Result<Vec<TradeEvent>, ChainError>;
}

/// Per-address transfer-clearance state on the ledger.
///
/// The registry owns the state; this service only reads it and may request a
/// `false -> true` transition. Callers decide how to treat query errors.
#[async_trait]
pub trait ComplianceRegistry: Send + Sync {
    async fn is_allowlisted(&self, address: &str) -> Result<bool, ChainError>;

    async fn set_allowlisted(&self, address: &str, allowed: bool)
        -> Result<TxOutcome, ChainError>;
}

/// Token-supply mutation submission.
///
/// `amount` is the unscaled integer string exactly as the trade event
/// carried it; scaling for display never happens at this boundary.
#[async_trait]
pub trait SupplyController: Send + Sync {
    async fn mint(
        &self,
        address: &str,
        symbol: TokenSymbol,
        amount: &str,
    ) -> Result<TxOutcome, ChainError>;

    async fn burn(
        &self,
        address: &str,
        symbol: TokenSymbol,
        amount: &str,
    ) -> Result<TxOutcome, ChainError>;
}
