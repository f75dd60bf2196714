//! Allowlist-gated mint/burn dispatch for one trade event.
//!
//! The per-event state machine:
//!
//! 1. check allowlist: a query error counts as "not allowlisted"
//!    (fail-closed: an unauthorized mutation is costlier than a missed one)
//! 2. not allowlisted: issue exactly one auto-allowlist request; any
//!    failure abandons the event's mutation for this cycle
//! 3. map the decoded ticker through the closed supported set; no match
//!    means no mutation, recorded as unsupported
//! 4. submit mint (buy) or burn (sell) with the unscaled amount and record
//!    the outcome
//!
//! Callers drive events sequentially in fetch order, so a later event for
//! the same address observes the effect of an earlier auto-allowlist.

use sbr_chain::normalize::{scale_for_display, ASSET_DECIMALS};
use sbr_chain::{ComplianceRegistry, SupplyController};
use sbr_schemas::{TokenSymbol, TradeEvent, TradeKind};
use tracing::{info, warn};

use crate::report::DispatchResult;

pub(crate) async fn dispatch_trade(
    registry: &dyn ComplianceRegistry,
    supply: &dyn SupplyController,
    ev: &TradeEvent,
) -> DispatchResult {
    if let Some(message) = ensure_allowlisted(registry, &ev.account_address).await {
        return DispatchResult::AllowlistAbandoned { message };
    }

    let symbol = match TokenSymbol::from_ticker(&ev.ticker) {
        Some(s) => s,
        None => {
            return DispatchResult::UnsupportedTicker {
                ticker: ev.ticker.clone(),
            }
        }
    };

    let submitted = match ev.kind {
        TradeKind::Buy => supply.mint(&ev.account_address, symbol, &ev.asset_amount).await,
        TradeKind::Sell => supply.burn(&ev.account_address, symbol, &ev.asset_amount).await,
    };

    match submitted {
        Ok(outcome) => {
            info!(
                trade = %ev.trade_id(),
                %symbol,
                amount = %ev.asset_amount,
                amount_display = %display_amount(&ev.asset_amount),
                tx_hash = %outcome.tx_hash,
                success = outcome.success,
                "supply mutation submitted"
            );
            match ev.kind {
                TradeKind::Buy => DispatchResult::Minted(outcome),
                TradeKind::Sell => DispatchResult::Burned(outcome),
            }
        }
        Err(e) => DispatchResult::SubmitError {
            message: e.to_string(),
        },
    }
}

/// Returns `None` when the address is cleared to transact, `Some(reason)`
/// when the event must be abandoned.
async fn ensure_allowlisted(registry: &dyn ComplianceRegistry, address: &str) -> Option<String> {
    let allowlisted = match registry.is_allowlisted(address).await {
        Ok(v) => v,
        Err(e) => {
            warn!(%address, error = %e, "allowlist check failed; treating as not allowlisted");
            false
        }
    };
    if allowlisted {
        return None;
    }

    // One remediation attempt per event per cycle, never more.
    match registry.set_allowlisted(address, true).await {
        Ok(outcome) if outcome.success => {
            info!(%address, tx_hash = %outcome.tx_hash, "address auto-allowlisted");
            None
        }
        Ok(outcome) => Some(outcome.error_text().to_string()),
        Err(e) => Some(e.to_string()),
    }
}

/// Display form for logs only; the submitted amount stays unscaled.
fn display_amount(unscaled: &str) -> String {
    scale_for_display(unscaled, ASSET_DECIMALS).unwrap_or_else(|_| unscaled.to_string())
}
