//! Per-invocation capabilities supplied by the host
//!
//! The host hands every entry point a [`TransactionContext`] that bundles
//! world-state access, event emission and the invocation's transaction ID.
//! Nothing here outlives one invocation; the host commits every staged write
//! and event together, or discards them all when the entry point fails.

use crate::{types::TxId, Result};

/// Key-value world state for the current invocation
pub trait WorldState {
    /// Read a value, `None` when the key is absent
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stage a write
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// Event emitter for the current invocation
pub trait EventSink {
    /// Stage a named event
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()>;
}

/// Combined host stub: world state plus events
pub trait Stub: WorldState + EventSink {}

impl<T: WorldState + EventSink> Stub for T {}

/// Capabilities for one invocation
pub struct TransactionContext<'a> {
    stub: &'a mut dyn Stub,
    tx_id: TxId,
}

impl<'a> TransactionContext<'a> {
    /// Create context for an invocation
    pub fn new(tx_id: TxId, stub: &'a mut dyn Stub) -> Self {
        Self { stub, tx_id }
    }

    /// Transaction ID assigned by the host
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// Read from world state
    pub fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.stub.get_state(key)
    }

    /// Stage a world-state write
    pub fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.stub.put_state(key, value)
    }

    /// Stage an event
    pub fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()> {
        self.stub.set_event(name, payload)
    }
}

impl std::fmt::Debug for TransactionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("tx_id", &self.tx_id)
            .finish_non_exhaustive()
    }
}
