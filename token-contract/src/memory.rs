//! In-process host for tests and embedding
//!
//! [`MemoryHost`] keeps world state in a `BTreeMap` and gives every
//! invocation a private copy. The copy replaces committed state only when the
//! invocation returns `Ok`, which reproduces the all-or-nothing commit a real
//! host applies.

use crate::{
    context::{EventSink, TransactionContext, WorldState},
    types::{EmittedEvent, TxId},
    Error, Result,
};
use std::collections::BTreeMap;

/// Committed state of an in-memory ledger
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: BTreeMap<String, Vec<u8>>,
    events: Vec<(TxId, EmittedEvent)>,
    next_tx: u64,
    reject_writes: bool,
    reject_events: bool,
}

impl MemoryHost {
    /// Create empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put_state` call fail (storage outage)
    pub fn reject_writes(mut self, reject: bool) -> Self {
        self.reject_writes = reject;
        self
    }

    /// Make every `set_event` call fail (emitter outage)
    pub fn reject_events(mut self, reject: bool) -> Self {
        self.reject_events = reject;
        self
    }

    /// Run one invocation and commit it only on success
    pub fn invoke<T>(
        &mut self,
        f: impl FnOnce(&mut TransactionContext<'_>) -> Result<T>,
    ) -> Result<T> {
        self.next_tx += 1;
        let tx_id = TxId::new(format!("tx-{:08}", self.next_tx));

        let mut scope = MemoryScope {
            state: self.state.clone(),
            events: Vec::new(),
            reject_writes: self.reject_writes,
            reject_events: self.reject_events,
        };

        let output = {
            let mut ctx = TransactionContext::new(tx_id.clone(), &mut scope);
            f(&mut ctx)?
        };

        self.state = scope.state;
        self.events
            .extend(scope.events.into_iter().map(|e| (tx_id.clone(), e)));

        Ok(output)
    }

    /// Committed raw value
    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    /// Overwrite a committed value directly, bypassing the contract
    pub fn put_raw(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.state.insert(key.into(), value.into());
    }

    /// Committed events in emission order
    pub fn events(&self) -> &[(TxId, EmittedEvent)] {
        &self.events
    }

    /// Number of committed keys
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether nothing has been committed
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

struct MemoryScope {
    state: BTreeMap<String, Vec<u8>>,
    events: Vec<EmittedEvent>,
    reject_writes: bool,
    reject_events: bool,
}

impl WorldState for MemoryScope {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.reject_writes {
            return Err(Error::Storage(format!("world state rejected write to {}", key)));
        }

        self.state.insert(key.to_string(), value);
        Ok(())
    }
}

impl EventSink for MemoryScope {
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()> {
        if self.reject_events {
            return Err(Error::Event(format!("event sink rejected {}", name)));
        }

        self.events.push(EmittedEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}
