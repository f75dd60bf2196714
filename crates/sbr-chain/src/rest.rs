//! REST adapter for the three ledger-side ports.
//!
//! Reads (event pages, allowlist view calls) go to the fullnode REST API;
//! mutations (mint, burn, allowlist set) go to the transaction-signer
//! sidecar, which owns key material and submits signed transactions. This
//! client never sees a private key.

use std::time::Duration;

use async_trait::async_trait;
use sbr_config::WatcherSettings;
use sbr_schemas::{TokenSymbol, TradeEvent, TradeKind, TxOutcome};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::normalize::normalize_event;
use crate::payload::RawEventEnvelope;
use crate::ports::{ComplianceRegistry, SupplyController, TradeFeed};
use crate::ChainError;

pub struct LedgerRestClient {
    http: reqwest::Client,
    node_url: String,
    signer_url: String,
    contract_address: String,
}

impl LedgerRestClient {
    pub fn new(settings: &WatcherSettings) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()
            .map_err(|e| ChainError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            node_url: settings.node_url.trim_end_matches('/').to_string(),
            signer_url: settings.signer_url.trim_end_matches('/').to_string(),
            contract_address: settings.contract_address.clone(),
        })
    }

    fn events_url(&self, kind: TradeKind) -> String {
        let field = match kind {
            TradeKind::Buy => "buy_events",
            TradeKind::Sell => "sell_events",
        };
        format!(
            "{}/v1/accounts/{}/events/{}::market::TradeEvents/{}",
            self.node_url, self.contract_address, self.contract_address, field
        )
    }

    async fn view_call(&self, function: &str, args: Vec<serde_json::Value>) -> Result<serde_json::Value, ChainError> {
        let resp = self
            .http
            .post(format!("{}/v1/view", self.node_url))
            .json(&json!({
                "function": format!("{}::{}", self.contract_address, function),
                "type_arguments": [],
                "arguments": args,
            }))
            .send()
            .await?;
        read_json(resp).await
    }

    async fn submit(&self, function: &str, args: Vec<serde_json::Value>) -> Result<TxOutcome, ChainError> {
        let resp = self
            .http
            .post(format!("{}/v1/transactions", self.signer_url))
            .json(&json!({
                "function": format!("{}::{}", self.contract_address, function),
                "type_arguments": [],
                "arguments": args,
            }))
            .send()
            .await?;
        let receipt: SignerReceipt = serde_json::from_value(read_json(resp).await?)
            .map_err(|e| ChainError::Decode(format!("signer receipt: {e}")))?;
        Ok(receipt.into_outcome())
    }
}

/// Receipt returned by the signer sidecar after a transaction lands.
#[derive(Debug, Deserialize)]
struct SignerReceipt {
    hash: String,
    success: bool,
    gas_used: Option<u64>,
    vm_status: Option<String>,
}

impl SignerReceipt {
    fn into_outcome(self) -> TxOutcome {
        TxOutcome {
            tx_hash: self.hash,
            success: self.success,
            gas_used: self.gas_used,
            error_message: if self.success { None } else { self.vm_status },
        }
    }
}

async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value, ChainError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(ChainError::Api {
            status: Some(status.as_u16()),
            message,
        });
    }
    resp.json().await.map_err(|e| ChainError::Decode(e.to_string()))
}

#[async_trait]
impl TradeFeed for LedgerRestClient {
    async fn fetch_trades(
        &self,
        kind: TradeKind,
        limit: u16,
    ) -> Result<Vec<TradeEvent>, ChainError> {
        let resp = self
            .http
            .get(self.events_url(kind))
            .query(&[("limit", limit.to_string()), ("order", "asc".to_string())])
            .send()
            .await?;
        let raw: Vec<RawEventEnvelope> = serde_json::from_value(read_json(resp).await?)
            .map_err(|e| ChainError::Decode(format!("event page: {e}")))?;

        let mut events: Vec<TradeEvent> = Vec::with_capacity(raw.len());
        for envelope in &raw {
            match normalize_event(kind, envelope) {
                Ok(ev) => events.push(ev),
                // One malformed event never blocks the rest of the page.
                Err(e) => warn!(
                    sequence_number = %envelope.sequence_number,
                    %kind,
                    error = %e,
                    "skipping malformed trade event"
                ),
            }
        }

        // Ordering is pinned ascending even if the node ignores `order`.
        // String-encoded integers sort numerically by (width, lexicographic).
        events.sort_by(|a, b| {
            (a.sequence_number.len(), a.sequence_number.as_str())
                .cmp(&(b.sequence_number.len(), b.sequence_number.as_str()))
        });

        Ok(events)
    }
}

#[async_trait]
impl ComplianceRegistry for LedgerRestClient {
    async fn is_allowlisted(&self, address: &str) -> Result<bool, ChainError> {
        let value = self
            .view_call("compliance::is_allowlisted", vec![json!(address)])
            .await?;
        // View responses arrive as a one-element result array.
        match value.get(0) {
            Some(serde_json::Value::Bool(b)) => Ok(*b),
            other => Err(ChainError::Decode(format!(
                "is_allowlisted view returned {other:?}"
            ))),
        }
    }

    async fn set_allowlisted(
        &self,
        address: &str,
        allowed: bool,
    ) -> Result<TxOutcome, ChainError> {
        self.submit(
            "compliance::set_allowlisted",
            vec![json!(address), json!(allowed)],
        )
        .await
    }
}

#[async_trait]
impl SupplyController for LedgerRestClient {
    async fn mint(
        &self,
        address: &str,
        symbol: TokenSymbol,
        amount: &str,
    ) -> Result<TxOutcome, ChainError> {
        self.submit(
            "supply::mint",
            vec![json!(address), json!(symbol.as_str()), json!(amount)],
        )
        .await
    }

    async fn burn(
        &self,
        address: &str,
        symbol: TokenSymbol,
        amount: &str,
    ) -> Result<TxOutcome, ChainError> {
        self.submit(
            "supply::burn",
            vec![json!(address), json!(symbol.as_str()), json!(amount)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbr_config::{
        DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL_SECONDS, DEFAULT_REQUEST_TIMEOUT_SECONDS,
    };

    fn settings() -> WatcherSettings {
        WatcherSettings {
            contract_address: "0xc0ffee".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            node_url: "https://node.example.com/".to_string(),
            signer_url: "http://127.0.0.1:7191".to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }

    #[test]
    fn events_url_per_kind() {
        let c = LedgerRestClient::new(&settings()).unwrap();
        assert_eq!(
            c.events_url(TradeKind::Buy),
            "https://node.example.com/v1/accounts/0xc0ffee/events/0xc0ffee::market::TradeEvents/buy_events"
        );
        assert!(c.events_url(TradeKind::Sell).ends_with("/sell_events"));
    }

    #[test]
    fn receipt_maps_failure_message() {
        let r = SignerReceipt {
            hash: "0xdead".into(),
            success: false,
            gas_used: Some(11),
            vm_status: Some("EALLOWLIST_FROZEN".into()),
        };
        let out = r.into_outcome();
        assert!(!out.success);
        assert_eq!(out.error_message.as_deref(), Some("EALLOWLIST_FROZEN"));
    }

    #[test]
    fn receipt_drops_vm_status_on_success() {
        let r = SignerReceipt {
            hash: "0xbeef".into(),
            success: true,
            gas_used: Some(7),
            vm_status: Some("Executed successfully".into()),
        };
        assert_eq!(r.into_outcome().error_message, None);
    }
}
