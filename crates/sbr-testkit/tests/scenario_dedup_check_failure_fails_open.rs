use std::sync::Arc;

use sbr_engine::Engine;
use sbr_schemas::TradeKind;
use sbr_testkit::{trade_event, MemoryTradeStore, ScriptedChain};

/// A broken existence check must include the event rather than drop it: a
/// duplicate attempt is recoverable, a silently skipped trade is not.
#[tokio::test]
async fn store_fault_during_filter_keeps_the_event() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());
    chain.allow("0xerin");
    store.fail_contains();

    chain.push_buy_page(vec![trade_event(TradeKind::Buy, "0xerin", "4", "LQD")]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);
    let report = engine.run_cycle().await.unwrap();

    assert_eq!(report.dedup_check_failures, 1);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.persisted, 1, "fail-open: event flowed through");
    assert_eq!(report.minted, 1);
    assert_eq!(chain.mint_calls().len(), 1);
}
