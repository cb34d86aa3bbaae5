//! Per-invocation staging over committed storage
//!
//! Reads see the invocation's own staged writes first, then committed state.
//! Nothing reaches RocksDB until the actor commits the resulting
//! [`ChangeSet`]; dropping the scope discards the invocation.

use crate::{storage::Storage, types::ChangeSet};
use token_contract::{EmittedEvent, EventSink, WorldState};

/// Staged writes and events of one invocation
#[derive(Debug)]
pub struct InvocationScope<'a> {
    storage: &'a Storage,
    changes: ChangeSet,
}

impl<'a> InvocationScope<'a> {
    /// Start an empty scope over committed storage
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            changes: ChangeSet::default(),
        }
    }

    /// Finish the invocation, yielding what it staged
    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }
}

impl WorldState for InvocationScope<'_> {
    fn get_state(&self, key: &str) -> token_contract::Result<Option<Vec<u8>>> {
        if let Some(value) = self.changes.writes.get(key) {
            return Ok(Some(value.clone()));
        }

        self.storage
            .get_state(key)
            .map_err(|e| token_contract::Error::Storage(e.to_string()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> token_contract::Result<()> {
        if key.is_empty() {
            return Err(token_contract::Error::Storage(
                "world-state key cannot be empty".to_string(),
            ));
        }

        self.changes.writes.insert(key.to_string(), value);
        Ok(())
    }
}

impl EventSink for InvocationScope<'_> {
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> token_contract::Result<()> {
        if name.is_empty() {
            return Err(token_contract::Error::Event(
                "event name cannot be empty".to_string(),
            ));
        }

        self.changes.events.push(EmittedEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}
