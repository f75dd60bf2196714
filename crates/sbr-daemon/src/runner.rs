//! Fixed-interval polling loop with an explicit re-entrancy guard.
//!
//! Cycles run as spawned tasks holding the guard's single permit; a tick
//! that finds the permit taken is skipped with a warning instead of piling
//! a second cycle onto a stalled one. Overlap protection does not depend on
//! the interval being larger than the slowest cycle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sbr_engine::{CycleReport, Engine};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::{debug, error, info, warn};

/// Single-permit, non-blocking gate over cycle execution.
pub struct CycleGuard {
    permits: Arc<Semaphore>,
}

impl Default for CycleGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleGuard {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the permit if free; `None` means a cycle is still running.
    pub fn try_begin(&self) -> Option<OwnedSemaphorePermit> {
        match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(TryAcquireError::NoPermits) => None,
            // The semaphore is never closed while the guard lives.
            Err(TryAcquireError::Closed) => None,
        }
    }
}

/// Drive the engine on a fixed period until ctrl-c.
pub async fn run_until_shutdown(engine: Arc<Engine>, period: Duration) {
    let guard = CycleGuard::new();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(period_secs = period.as_secs(), "poll loop started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let Some(permit) = guard.try_begin() else {
                    warn!("previous cycle still running; tick skipped");
                    continue;
                };
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    let _permit = permit;
                    run_one_cycle(&engine).await;
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received; poll loop stopping");
                break;
            }
        }
    }
}

async fn run_one_cycle(engine: &Engine) {
    let started = Instant::now();
    match engine.run_cycle().await {
        Ok(report) => log_report(&report, started.elapsed()),
        // Fetch failures abort only this cycle; the next tick retries.
        Err(e) => error!(error = %e, "cycle aborted"),
    }
}

fn log_report(report: &CycleReport, elapsed: Duration) {
    if report.is_quiet() {
        debug!(
            fetched = report.fetched,
            duplicates = report.duplicates,
            elapsed_ms = elapsed.as_millis() as u64,
            "cycle complete (quiet)"
        );
        return;
    }
    info!(
        fetched = report.fetched,
        duplicates = report.duplicates,
        dedup_check_failures = report.dedup_check_failures,
        persisted = report.persisted,
        persist_deduped = report.persist_deduped,
        persist_failures = report.persist_failures,
        minted = report.minted,
        burned = report.burned,
        unsupported = report.unsupported,
        allowlist_failures = report.allowlist_failures,
        submit_failures = report.submit_failures,
        elapsed_ms = elapsed.as_millis() as u64,
        "cycle complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_blocks_second_acquire_until_release() {
        let guard = CycleGuard::new();

        let first = guard.try_begin();
        assert!(first.is_some());
        assert!(guard.try_begin().is_none(), "permit held; tick must skip");

        drop(first);
        assert!(guard.try_begin().is_some(), "released permit is reusable");
    }
}
