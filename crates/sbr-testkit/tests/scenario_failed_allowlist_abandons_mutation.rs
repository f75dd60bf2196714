use std::sync::Arc;

use sbr_engine::{DispatchResult, Engine};
use sbr_schemas::{TradeKind, TxOutcome};
use sbr_testkit::{trade_event, MemoryTradeStore, ScriptedChain};

/// The clearance transaction lands but reports `success = false`: the
/// event's mutation is abandoned this cycle with the registry's reason
/// attached, and no mint is attempted.
#[tokio::test]
async fn allowlist_set_reporting_failure_abandons_the_event() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());

    chain.script_allowlist_set_outcome(TxOutcome {
        tx_hash: "0xdead".to_string(),
        success: false,
        gas_used: Some(4),
        error_message: Some("EALLOWLIST_DENIED".to_string()),
    });

    let ev = trade_event(TradeKind::Buy, "0xdave", "5", "USDC");
    chain.push_buy_page(vec![ev.clone()]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);
    let report = engine.run_cycle().await.unwrap();

    // Row persisted first; the dispatch failure does not roll it back.
    assert_eq!(report.persisted, 1);
    assert_eq!(report.allowlist_failures, 1);
    assert_eq!(report.minted, 0);
    assert!(chain.mint_calls().is_empty());
    assert_eq!(chain.allowlist_set_calls().len(), 1, "exactly one attempt");

    assert_eq!(
        report.dispositions[0].result,
        DispatchResult::AllowlistAbandoned {
            message: "EALLOWLIST_DENIED".to_string()
        }
    );
}
