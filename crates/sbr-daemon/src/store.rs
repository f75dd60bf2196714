//! Adapts the `processed_trades` table to the engine's storage port.

use async_trait::async_trait;
use sbr_engine::ProcessedTradeStore;
use sbr_schemas::{NewProcessedTrade, TradeId};
use sqlx::PgPool;

pub struct PgTradeStore {
    pool: PgPool,
}

impl PgTradeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessedTradeStore for PgTradeStore {
    async fn contains(&self, id: &TradeId) -> anyhow::Result<bool> {
        sbr_db::trade_exists(&self.pool, id).await
    }

    async fn insert(&self, row: &NewProcessedTrade) -> anyhow::Result<bool> {
        sbr_db::insert_processed_trade(&self.pool, row).await
    }
}
