//! One fetch -> filter -> persist -> dispatch pass.

use std::fmt;
use std::sync::Arc;

use sbr_chain::{ChainError, ComplianceRegistry, SupplyController, TradeFeed};
use sbr_schemas::{NewProcessedTrade, TradeEvent, TradeKind};
use tracing::warn;

use crate::dispatch::dispatch_trade;
use crate::filter::filter_new;
use crate::report::CycleReport;
use crate::store::ProcessedTradeStore;

/// A cycle-aborting failure. Per-event failures never surface here; they
/// land in the [`CycleReport`].
#[derive(Debug)]
pub enum CycleError {
    /// Event fetch failed; the whole cycle is abandoned and the next tick
    /// retries from scratch.
    Fetch(ChainError),
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::Fetch(e) => write!(f, "event fetch failed: {e}"),
        }
    }
}

impl std::error::Error for CycleError {}

/// The reconciliation engine. Owns policy only; every collaborator comes in
/// as a trait object.
pub struct Engine {
    feed: Arc<dyn TradeFeed>,
    registry: Arc<dyn ComplianceRegistry>,
    supply: Arc<dyn SupplyController>,
    store: Arc<dyn ProcessedTradeStore>,
    page_size: u16,
}

impl Engine {
    pub fn new(
        feed: Arc<dyn TradeFeed>,
        registry: Arc<dyn ComplianceRegistry>,
        supply: Arc<dyn SupplyController>,
        store: Arc<dyn ProcessedTradeStore>,
        page_size: u16,
    ) -> Self {
        Self {
            feed,
            registry,
            supply,
            store,
            page_size,
        }
    }

    /// Run one polling cycle and return its accounting.
    ///
    /// Stages, in order:
    /// - fetch both kinds (either failing aborts the cycle);
    /// - filter out already-recorded events per kind, fail-open on check
    ///   errors;
    /// - persist fresh events one row at a time; a failed or deduped
    ///   insert only excludes that event from dispatch, never its siblings;
    /// - dispatch mutations sequentially in fetch order (buys, then sells).
    ///
    /// Only events whose row was created by this cycle are dispatched: a
    /// deduped insert means another cycle owns the event, and an errored
    /// insert leaves the event unrecorded so the next cycle retries it
    /// whole. Dispatching either would risk a double mutation.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let buys = self
            .feed
            .fetch_trades(TradeKind::Buy, self.page_size)
            .await
            .map_err(CycleError::Fetch)?;
        let sells = self
            .feed
            .fetch_trades(TradeKind::Sell, self.page_size)
            .await
            .map_err(CycleError::Fetch)?;

        let mut report = CycleReport {
            fetched: buys.len() + sells.len(),
            ..CycleReport::default()
        };

        let fresh_buys = filter_new(self.store.as_ref(), buys, &mut report).await;
        let fresh_sells = filter_new(self.store.as_ref(), sells, &mut report).await;

        let mut dispatchable: Vec<TradeEvent> = Vec::new();
        for ev in fresh_buys.into_iter().chain(fresh_sells) {
            let row = NewProcessedTrade::from_event(&ev);
            match self.store.insert(&row).await {
                Ok(true) => {
                    report.persisted += 1;
                    dispatchable.push(ev);
                }
                Ok(false) => {
                    report.persist_deduped += 1;
                    warn!(trade = %ev.trade_id(), "row already recorded by another writer; skipping dispatch");
                }
                Err(e) => {
                    report.persist_failures += 1;
                    warn!(trade = %ev.trade_id(), error = %e, "insert failed; event will retry next cycle");
                }
            }
        }

        for ev in &dispatchable {
            let result =
                dispatch_trade(self.registry.as_ref(), self.supply.as_ref(), ev).await;
            report.record(ev.trade_id(), result);
        }

        Ok(report)
    }
}
