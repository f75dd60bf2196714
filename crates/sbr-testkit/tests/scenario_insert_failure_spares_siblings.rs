use std::sync::Arc;

use sbr_engine::Engine;
use sbr_schemas::TradeKind;
use sbr_testkit::{trade_event, MemoryTradeStore, ScriptedChain};

/// One failed insert is tallied and excluded from dispatch; its siblings
/// persist and mutate normally. The failed event stays unrecorded and will
/// retry whole on a later cycle.
#[tokio::test]
async fn failed_insert_only_affects_its_own_event() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());
    chain.allow("0xkim");
    store.fail_insert_on("20");

    chain.push_buy_page(vec![
        trade_event(TradeKind::Buy, "0xkim", "20", "TSLA"),
        trade_event(TradeKind::Buy, "0xkim", "21", "TSLA"),
    ]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);
    let report = engine.run_cycle().await.unwrap();

    assert_eq!(report.persist_failures, 1);
    assert_eq!(report.persisted, 1);
    assert_eq!(report.minted, 1, "sibling still dispatched");
    assert_eq!(chain.mint_calls().len(), 1);
    assert_eq!(store.len(), 1);

    // Next cycle: the feed window still contains both; only the previously
    // failed one is fresh now.
    store.clear_insert_fault();
    chain.push_buy_page(vec![
        trade_event(TradeKind::Buy, "0xkim", "20", "TSLA"),
        trade_event(TradeKind::Buy, "0xkim", "21", "TSLA"),
    ]);
    let second = engine.run_cycle().await.unwrap();

    assert_eq!(second.duplicates, 1);
    assert_eq!(second.persisted, 1);
    assert_eq!(second.minted, 1);
    assert_eq!(store.len(), 2);
}
