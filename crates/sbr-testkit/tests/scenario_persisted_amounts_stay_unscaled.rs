use std::sync::Arc;

use sbr_chain::normalize::{scale_for_display, ASSET_DECIMALS};
use sbr_engine::Engine;
use sbr_schemas::TradeKind;
use sbr_testkit::{trade_event, MemoryTradeStore, ScriptedChain};

/// The stored amount round-trips the exact unscaled integer string; the
/// display-scaled value exists only for logs and differs from it.
#[tokio::test]
async fn stored_row_carries_original_unscaled_strings() {
    let chain = Arc::new(ScriptedChain::new());
    let store = Arc::new(MemoryTradeStore::new());
    chain.allow("0xheidi");

    let mut ev = trade_event(TradeKind::Buy, "0xheidi", "8", "TSLA");
    ev.asset_amount = "12345678901234567890123456789012345678901234567890".to_string();
    ev.usdc_amount = "1234567".to_string();
    chain.push_buy_page(vec![ev.clone()]);

    let engine = Engine::new(chain.clone(), chain.clone(), chain.clone(), store.clone(), 3);
    engine.run_cycle().await.unwrap();

    let row = store.get(&ev.trade_id()).expect("row persisted");
    assert_eq!(row.asset_amount, ev.asset_amount);
    assert_eq!(row.usdc_amount, "1234567");
    assert_eq!(row.price, ev.price);

    let display = scale_for_display(&row.asset_amount, ASSET_DECIMALS).unwrap();
    assert_ne!(display, row.asset_amount);
    assert_eq!(display, "12345678901234567890123456789012.34567890123456789");

    // The mint was submitted with the unscaled form, too.
    let mints = chain.mint_calls();
    assert!(matches!(
        &mints[0],
        sbr_testkit::RecordedCall::Mint { amount, .. } if *amount == ev.asset_amount
    ));
}
