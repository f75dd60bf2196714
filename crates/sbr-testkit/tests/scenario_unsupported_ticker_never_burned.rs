use std::sync::Arc;

use sbr_engine::{DispatchResult, Engine};
use sbr_schemas::TradeKind;
use sbr_testkit::{trade_event, MemoryTradeStore, ScriptedChain};

/// GOLD is outside the supported set {USD, USDC, LQD, TSLA, AAPL}: the
/// event is persisted but no burn is ever submitted.
#[tokio::test]
async fn sell_with_unmapped_ticker_is_recorded_unsupported() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());
    chain.allow("0xcarol");

    let ev = trade_event(TradeKind::Sell, "0xcarol", "3", "GOLD");
    chain.push_sell_page(vec![ev.clone()]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);
    let report = engine.run_cycle().await.unwrap();

    assert_eq!(report.persisted, 1);
    assert_eq!(report.unsupported, 1);
    assert_eq!(report.burned, 0);
    assert!(chain.burn_calls().is_empty(), "burn must never be attempted");
    assert!(store.get(&ev.trade_id()).is_some());

    assert_eq!(report.dispositions.len(), 1);
    assert_eq!(
        report.dispositions[0].result,
        DispatchResult::UnsupportedTicker {
            ticker: "GOLD".to_string()
        }
    );
}
