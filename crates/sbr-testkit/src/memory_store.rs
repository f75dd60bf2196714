use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sbr_engine::ProcessedTradeStore;
use sbr_schemas::{NewProcessedTrade, TradeId};

#[derive(Default)]
struct Inner {
    rows: HashMap<TradeId, NewProcessedTrade>,
    fail_contains: bool,
    fail_insert_on: Option<String>,
}

/// In-memory [`ProcessedTradeStore`] mirroring the unique-constraint
/// semantics of the real table: a second insert for the same trade id
/// returns `Ok(false)`.
#[derive(Default)]
pub struct MemoryTradeStore {
    inner: Mutex<Inner>,
}

impl MemoryTradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every existence check fail (fail-open path in the engine).
    pub fn fail_contains(&self) {
        self.inner.lock().unwrap().fail_contains = true;
    }

    /// Make inserts fail for one sequence number, leaving siblings intact.
    pub fn fail_insert_on(&self, sequence_number: &str) {
        self.inner.lock().unwrap().fail_insert_on = Some(sequence_number.to_string());
    }

    pub fn clear_insert_fault(&self) {
        self.inner.lock().unwrap().fail_insert_on = None;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &TradeId) -> Option<NewProcessedTrade> {
        self.inner.lock().unwrap().rows.get(id).cloned()
    }
}

#[async_trait]
impl ProcessedTradeStore for MemoryTradeStore {
    async fn contains(&self, id: &TradeId) -> anyhow::Result<bool> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_contains {
            anyhow::bail!("scripted store failure");
        }
        Ok(inner.rows.contains_key(id))
    }

    async fn insert(&self, row: &NewProcessedTrade) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_insert_on.as_deref() == Some(row.sequence_number.as_str()) {
            anyhow::bail!("scripted insert failure");
        }
        let id = row.trade_id();
        if inner.rows.contains_key(&id) {
            return Ok(false);
        }
        inner.rows.insert(id, row.clone());
        Ok(true)
    }
}
