//! Deterministic in-process fakes for engine scenario tests.
//!
//! No network I/O, no randomness beyond row uuids. The scripted chain
//! records every call it receives so tests can assert exact call counts;
//! the memory store mirrors the unique-constraint semantics of the real
//! table and can inject existence-check faults.

mod memory_store;
mod scripted_chain;

pub use memory_store::MemoryTradeStore;
pub use scripted_chain::{trade_event, RecordedCall, ScriptedChain};
