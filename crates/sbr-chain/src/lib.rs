//! Ledger boundary for supply-bridge.
//!
//! This crate owns everything that touches the chain: the port traits the
//! engine consumes ([`TradeFeed`], [`ComplianceRegistry`],
//! [`SupplyController`]), the typed [`ChainError`], the raw REST payload
//! shapes, normalization of raw payloads into [`sbr_schemas::TradeEvent`],
//! and the [`LedgerRestClient`] adapter. No database logic, no dispatch
//! policy.

mod error;
pub mod normalize;
mod payload;
mod ports;
mod rest;

pub use error::ChainError;
pub use payload::{RawEventEnvelope, RawTradePayload};
pub use ports::{ComplianceRegistry, SupplyController, TradeFeed};
pub use rest::LedgerRestClient;
