use sbr_schemas::TradeEvent;
use tracing::warn;

use crate::report::CycleReport;
use crate::store::ProcessedTradeStore;

/// Drop events that already have a record, preserving input order.
///
/// A failed existence check keeps the event (fail-open): a duplicate
/// processing attempt is cheaper than silently dropping a legitimate event,
/// and the unique constraint at the store catches the duplicate at insert.
pub async fn filter_new(
    store: &dyn ProcessedTradeStore,
    events: Vec<TradeEvent>,
    report: &mut CycleReport,
) -> Vec<TradeEvent> {
    let mut fresh = Vec::with_capacity(events.len());

    for ev in events {
        let id = ev.trade_id();
        match store.contains(&id).await {
            Ok(true) => report.duplicates += 1,
            Ok(false) => fresh.push(ev),
            Err(e) => {
                report.dedup_check_failures += 1;
                warn!(trade = %id, error = %e, "existence check failed; treating event as new");
                fresh.push(ev);
            }
        }
    }

    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use sbr_schemas::{NewProcessedTrade, TradeId, TradeKind};
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FakeStore {
        known: Mutex<HashSet<String>>,
        fail_on: Option<String>,
    }

    impl FakeStore {
        fn with_known(seqs: &[&str]) -> Self {
            Self {
                known: Mutex::new(seqs.iter().map(|s| s.to_string()).collect()),
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl ProcessedTradeStore for FakeStore {
        async fn contains(&self, id: &TradeId) -> anyhow::Result<bool> {
            if self.fail_on.as_deref() == Some(id.sequence_number.as_str()) {
                anyhow::bail!("store unavailable");
            }
            Ok(self.known.lock().unwrap().contains(&id.sequence_number))
        }

        async fn insert(&self, row: &NewProcessedTrade) -> anyhow::Result<bool> {
            Ok(self
                .known
                .lock()
                .unwrap()
                .insert(row.sequence_number.clone()))
        }
    }

    fn event(seq: &str) -> TradeEvent {
        TradeEvent {
            kind: TradeKind::Buy,
            account_address: "0xabc".into(),
            sequence_number: seq.into(),
            ticker_raw: "TSLA".into(),
            ticker: "TSLA".into(),
            usdc_amount: "1000000".into(),
            asset_amount: "5000000000000000000".into(),
            price: "200000000000000000000".into(),
            ledger_version: "1".into(),
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn known_events_filtered_order_preserved() {
        let store = FakeStore::with_known(&["2"]);
        let mut report = CycleReport::default();

        let fresh = filter_new(
            &store,
            vec![event("1"), event("2"), event("3")],
            &mut report,
        )
        .await;

        let seqs: Vec<&str> = fresh.iter().map(|e| e.sequence_number.as_str()).collect();
        assert_eq!(seqs, vec!["1", "3"]);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.dedup_check_failures, 0);
    }

    #[tokio::test]
    async fn failed_check_keeps_event() {
        let mut store = FakeStore::with_known(&[]);
        store.fail_on = Some("1".into());
        let mut report = CycleReport::default();

        let fresh = filter_new(&store, vec![event("1"), event("2")], &mut report).await;

        assert_eq!(fresh.len(), 2, "fail-open: the event must not be dropped");
        assert_eq!(report.dedup_check_failures, 1);
    }
}
