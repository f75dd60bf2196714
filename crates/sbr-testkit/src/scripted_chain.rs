use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sbr_chain::{ChainError, ComplianceRegistry, SupplyController, TradeFeed};
use sbr_schemas::{TokenSymbol, TradeEvent, TradeKind, TxOutcome};

/// Every call the scripted chain received, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
    FetchTrades {
        kind: TradeKind,
    },
    AllowlistCheck {
        address: String,
    },
    AllowlistSet {
        address: String,
        allowed: bool,
    },
    Mint {
        address: String,
        symbol: TokenSymbol,
        amount: String,
    },
    Burn {
        address: String,
        symbol: TokenSymbol,
        amount: String,
    },
}

#[derive(Default)]
struct Inner {
    buy_pages: VecDeque<Vec<TradeEvent>>,
    sell_pages: VecDeque<Vec<TradeEvent>>,
    allowlist: HashSet<String>,
    fail_fetch: bool,
    fail_allowlist_checks: bool,
    allowlist_set_outcome: Option<TxOutcome>,
    fail_submit: bool,
    calls: Vec<RecordedCall>,
    next_tx: u64,
}

/// Programmable chain fake implementing all three ledger ports.
///
/// Pages are consumed one per fetch; an exhausted side returns an empty
/// page, matching a quiet feed. Auto-allowlist mutates the in-memory
/// allowlist, so a later check in the same run observes the transition.
#[derive(Default)]
pub struct ScriptedChain {
    inner: Mutex<Inner>,
}

impl ScriptedChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_buy_page(&self, page: Vec<TradeEvent>) {
        self.inner.lock().unwrap().buy_pages.push_back(page);
    }

    pub fn push_sell_page(&self, page: Vec<TradeEvent>) {
        self.inner.lock().unwrap().sell_pages.push_back(page);
    }

    /// Pre-seed an address as allowlisted.
    pub fn allow(&self, address: &str) {
        self.inner.lock().unwrap().allowlist.insert(address.to_string());
    }

    /// Make every fetch fail with a transport error.
    pub fn fail_fetch(&self) {
        self.inner.lock().unwrap().fail_fetch = true;
    }

    /// Make every allowlist check fail with a transport error.
    pub fn fail_allowlist_checks(&self) {
        self.inner.lock().unwrap().fail_allowlist_checks = true;
    }

    /// Script the outcome returned by the next (and all later) allowlist
    /// set calls, e.g. a `success = false` receipt. The allowlist is not
    /// mutated when the scripted outcome is a failure.
    pub fn script_allowlist_set_outcome(&self, outcome: TxOutcome) {
        self.inner.lock().unwrap().allowlist_set_outcome = Some(outcome);
    }

    /// Make every mint/burn submission fail with a transport error.
    pub fn fail_submit(&self) {
        self.inner.lock().unwrap().fail_submit = true;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn mint_calls(&self) -> Vec<RecordedCall> {
        self.calls_matching(|c| matches!(c, RecordedCall::Mint { .. }))
    }

    pub fn burn_calls(&self) -> Vec<RecordedCall> {
        self.calls_matching(|c| matches!(c, RecordedCall::Burn { .. }))
    }

    pub fn allowlist_set_calls(&self) -> Vec<RecordedCall> {
        self.calls_matching(|c| matches!(c, RecordedCall::AllowlistSet { .. }))
    }

    fn calls_matching(&self, pred: impl Fn(&RecordedCall) -> bool) -> Vec<RecordedCall> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| pred(c))
            .cloned()
            .collect()
    }

    fn next_outcome(inner: &mut Inner) -> TxOutcome {
        inner.next_tx += 1;
        TxOutcome {
            tx_hash: format!("0xfeed{:04}", inner.next_tx),
            success: true,
            gas_used: Some(21),
            error_message: None,
        }
    }
}

#[async_trait]
impl TradeFeed for ScriptedChain {
    async fn fetch_trades(
        &self,
        kind: TradeKind,
        _limit: u16,
    ) -> Result<Vec<TradeEvent>, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::FetchTrades { kind });
        if inner.fail_fetch {
            return Err(ChainError::Transport("scripted fetch failure".into()));
        }
        let pages = match kind {
            TradeKind::Buy => &mut inner.buy_pages,
            TradeKind::Sell => &mut inner.sell_pages,
        };
        Ok(pages.pop_front().unwrap_or_default())
    }
}

#[async_trait]
impl ComplianceRegistry for ScriptedChain {
    async fn is_allowlisted(&self, address: &str) -> Result<bool, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::AllowlistCheck {
            address: address.to_string(),
        });
        if inner.fail_allowlist_checks {
            return Err(ChainError::Transport("scripted registry failure".into()));
        }
        Ok(inner.allowlist.contains(address))
    }

    async fn set_allowlisted(
        &self,
        address: &str,
        allowed: bool,
    ) -> Result<TxOutcome, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::AllowlistSet {
            address: address.to_string(),
            allowed,
        });
        if let Some(outcome) = inner.allowlist_set_outcome.clone() {
            if outcome.success {
                apply_allowlist(&mut inner, address, allowed);
            }
            return Ok(outcome);
        }
        apply_allowlist(&mut inner, address, allowed);
        Ok(Self::next_outcome(&mut inner))
    }
}

fn apply_allowlist(inner: &mut Inner, address: &str, allowed: bool) {
    if allowed {
        inner.allowlist.insert(address.to_string());
    } else {
        inner.allowlist.remove(address);
    }
}

#[async_trait]
impl SupplyController for ScriptedChain {
    async fn mint(
        &self,
        address: &str,
        symbol: TokenSymbol,
        amount: &str,
    ) -> Result<TxOutcome, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::Mint {
            address: address.to_string(),
            symbol,
            amount: amount.to_string(),
        });
        if inner.fail_submit {
            return Err(ChainError::Transport("scripted submit failure".into()));
        }
        Ok(Self::next_outcome(&mut inner))
    }

    async fn burn(
        &self,
        address: &str,
        symbol: TokenSymbol,
        amount: &str,
    ) -> Result<TxOutcome, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::Burn {
            address: address.to_string(),
            symbol,
            amount: amount.to_string(),
        });
        if inner.fail_submit {
            return Err(ChainError::Transport("scripted submit failure".into()));
        }
        Ok(Self::next_outcome(&mut inner))
    }
}

/// Build a trade event with deterministic filler for the fields a scenario
/// does not care about.
pub fn trade_event(kind: TradeKind, address: &str, seq: &str, ticker: &str) -> TradeEvent {
    TradeEvent {
        kind,
        account_address: address.to_string(),
        sequence_number: seq.to_string(),
        ticker_raw: ticker.to_string(),
        ticker: ticker.to_string(),
        usdc_amount: "2500000".to_string(),
        asset_amount: "10000000000000000".to_string(),
        price: "250000000000000000000".to_string(),
        ledger_version: "1000".to_string(),
        occurred_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    }
}
