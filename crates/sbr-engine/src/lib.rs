//! sbr-engine
//!
//! The reconciliation core. One polling cycle fetches both trade kinds,
//! filters out already-recorded events, persists the fresh ones, and drives
//! the allowlist-gated mint/burn dispatch.
//!
//! Policy decisions owned here:
//! - dedup-check failure is fail-open (event treated as new)
//! - allowlist-check failure is fail-closed (treated as not allowlisted)
//! - exactly one auto-allowlist attempt per event per cycle
//! - unsupported tickers never reach the supply controller
//! - per-event failures are tallied, never propagated to siblings
//! - every cycle returns a [`CycleReport`]; no shared mutable counters
//!
//! All I/O arrives through trait objects; this crate has no clients of its
//! own.

mod cycle;
mod dispatch;
mod filter;
mod report;
mod store;

pub use cycle::{CycleError, Engine};
pub use filter::filter_new;
pub use report::{CycleReport, DispatchResult, TradeDisposition};
pub use store::ProcessedTradeStore;
