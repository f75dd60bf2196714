use async_trait::async_trait;
use sbr_schemas::{NewProcessedTrade, TradeId};

/// The engine's only storage seam.
///
/// Production wires this to the `processed_trades` table (sbr-daemon's
/// Postgres adapter over sbr-db); tests use the in-memory store from
/// sbr-testkit.
#[async_trait]
pub trait ProcessedTradeStore: Send + Sync {
    /// Whether a record already exists for this trade id.
    async fn contains(&self, id: &TradeId) -> anyhow::Result<bool>;

    /// Persist one record. `Ok(false)` means another writer recorded the
    /// same trade id first (treated as already processed, not an error).
    async fn insert(&self, row: &NewProcessedTrade) -> anyhow::Result<bool>;
}
