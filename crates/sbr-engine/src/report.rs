use sbr_schemas::{TradeId, TxOutcome};

/// Terminal per-event dispatch result. Recorded once per trade per cycle;
/// nothing here is retried within the cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchResult {
    /// Mint submitted; the outcome may still carry `success = false`.
    Minted(TxOutcome),
    /// Burn submitted; the outcome may still carry `success = false`.
    Burned(TxOutcome),
    /// Decoded ticker is outside the supported set; no mutation attempted.
    UnsupportedTicker { ticker: String },
    /// Auto-allowlist failed; mutation abandoned with the registry's reason.
    AllowlistAbandoned { message: String },
    /// The mint/burn submission itself errored before an outcome existed.
    SubmitError { message: String },
}

/// Evidence of what happened to one trade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeDisposition {
    pub trade: TradeId,
    pub result: DispatchResult,
}

/// Per-cycle accounting, returned to the caller. Aggregation across cycles
/// belongs to whoever runs the loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Events returned by the feed this cycle, both kinds.
    pub fetched: usize,
    /// Events filtered out because a record already existed.
    pub duplicates: usize,
    /// Existence checks that errored (events kept, fail-open).
    pub dedup_check_failures: usize,
    /// Rows created by this cycle.
    pub persisted: usize,
    /// Inserts that lost to another writer (unique violation).
    pub persist_deduped: usize,
    /// Inserts that errored; the event stays eligible for the next cycle.
    pub persist_failures: usize,
    pub minted: usize,
    pub burned: usize,
    pub unsupported: usize,
    pub allowlist_failures: usize,
    pub submit_failures: usize,
    pub dispositions: Vec<TradeDisposition>,
}

impl CycleReport {
    pub fn record(&mut self, trade: TradeId, result: DispatchResult) {
        match &result {
            DispatchResult::Minted(out) => {
                if out.success {
                    self.minted += 1;
                } else {
                    self.submit_failures += 1;
                }
            }
            DispatchResult::Burned(out) => {
                if out.success {
                    self.burned += 1;
                } else {
                    self.submit_failures += 1;
                }
            }
            DispatchResult::UnsupportedTicker { .. } => self.unsupported += 1,
            DispatchResult::AllowlistAbandoned { .. } => self.allowlist_failures += 1,
            DispatchResult::SubmitError { .. } => self.submit_failures += 1,
        }
        self.dispositions.push(TradeDisposition { trade, result });
    }

    /// True when the cycle neither mutated supply nor hit any failure.
    pub fn is_quiet(&self) -> bool {
        self.minted == 0
            && self.burned == 0
            && self.dedup_check_failures == 0
            && self.persist_failures == 0
            && self.allowlist_failures == 0
            && self.submit_failures == 0
            && self.unsupported == 0
    }
}
