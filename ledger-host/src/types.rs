//! Host-side records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use token_contract::{EmittedEvent, TxId};

/// Writes and events staged by one successful invocation
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// World-state writes, last write per key wins
    pub writes: BTreeMap<String, Vec<u8>>,

    /// Events in emission order
    pub events: Vec<EmittedEvent>,
}

impl ChangeSet {
    /// Whether the invocation staged nothing
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }
}

/// Committed record of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction ID assigned by the host
    pub tx_id: TxId,

    /// Contract function that was invoked
    pub function: String,

    /// Keys written by the invocation
    pub written_keys: Vec<String>,

    /// Events emitted by the invocation
    pub events: Vec<EmittedEvent>,

    /// Commit timestamp
    pub committed_at: DateTime<Utc>,
}
