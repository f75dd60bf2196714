use std::sync::Arc;

use sbr_engine::Engine;
use sbr_schemas::TradeKind;
use sbr_testkit::{trade_event, MemoryTradeStore, ScriptedChain};

/// The feed is a trailing window, so the same event arrives again next
/// cycle. The second pass must neither insert nor mint a second time.
#[tokio::test]
async fn second_cycle_with_same_event_is_a_no_op() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());
    chain.allow("0xbob");

    let ev = trade_event(TradeKind::Buy, "0xbob", "9", "AAPL");
    chain.push_buy_page(vec![ev.clone()]);
    chain.push_buy_page(vec![ev.clone()]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);

    let first = engine.run_cycle().await.unwrap();
    assert_eq!(first.persisted, 1);
    assert_eq!(first.minted, 1);

    let second = engine.run_cycle().await.unwrap();
    assert_eq!(second.fetched, 1);
    assert_eq!(second.duplicates, 1);
    assert_eq!(second.persisted, 0);
    assert_eq!(second.minted, 0);
    assert!(second.dispositions.is_empty());

    assert_eq!(store.len(), 1, "no second row");
    assert_eq!(chain.mint_calls().len(), 1, "no second mint");
}
