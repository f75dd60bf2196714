use std::sync::Arc;

use sbr_engine::Engine;
use sbr_schemas::TradeKind;
use sbr_testkit::{trade_event, MemoryTradeStore, ScriptedChain};

/// Dispatch is sequential in fetch order, so the second trade from the same
/// address observes the clearance performed for the first: one allowlist
/// write, two mints.
#[tokio::test]
async fn second_trade_sees_effect_of_first_auto_allowlist() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());

    chain.push_buy_page(vec![
        trade_event(TradeKind::Buy, "0xjudy", "10", "AAPL"),
        trade_event(TradeKind::Buy, "0xjudy", "11", "AAPL"),
    ]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);
    let report = engine.run_cycle().await.unwrap();

    assert_eq!(chain.allowlist_set_calls().len(), 1);
    assert_eq!(chain.mint_calls().len(), 2);
    assert_eq!(report.minted, 2);
    assert_eq!(report.persisted, 2);
}
