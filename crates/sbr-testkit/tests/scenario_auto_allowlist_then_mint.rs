use std::sync::Arc;

use sbr_engine::Engine;
use sbr_schemas::{TokenSymbol, TradeKind};
use sbr_testkit::{trade_event, MemoryTradeStore, RecordedCall, ScriptedChain};

#[tokio::test]
async fn buy_from_new_address_is_allowlisted_then_minted() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());

    let ev = trade_event(TradeKind::Buy, "0xalice", "1", "TSLA");
    chain.push_buy_page(vec![ev.clone()]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);
    let report = engine.run_cycle().await.unwrap();

    assert_eq!(report.persisted, 1);
    assert_eq!(report.minted, 1);
    assert_eq!(report.allowlist_failures, 0);
    assert_eq!(store.len(), 1);

    // Exactly one clearance request, then exactly one mint.
    let sets = chain.allowlist_set_calls();
    assert_eq!(
        sets,
        vec![RecordedCall::AllowlistSet {
            address: "0xalice".to_string(),
            allowed: true,
        }]
    );
    let mints = chain.mint_calls();
    assert_eq!(
        mints,
        vec![RecordedCall::Mint {
            address: "0xalice".to_string(),
            symbol: TokenSymbol::Tsla,
            amount: ev.asset_amount.clone(),
        }]
    );

    // The clearance request precedes the mint in the call log.
    let calls = chain.calls();
    let set_pos = calls.iter().position(|c| matches!(c, RecordedCall::AllowlistSet { .. }));
    let mint_pos = calls.iter().position(|c| matches!(c, RecordedCall::Mint { .. }));
    assert!(set_pos.unwrap() < mint_pos.unwrap());
}
