//! Core types for the token ledger
//!
//! Field names on the wire match the deployed contract's JSON records:
//! accounts are `{"ID", "type", "balance"}` and transactions are
//! `{"TXID", "from", "to", "value"}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the event emitted by a successful transfer
pub const TRANSFER_EVENT: &str = "Transfer";

/// Account identifier (world-state key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Host-assigned transaction identifier, unique per invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Create new transaction ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique key in world state
    #[serde(rename = "ID")]
    pub id: AccountId,

    /// Free-form tag ("user", "seller", ...)
    #[serde(rename = "type")]
    pub account_type: String,

    /// Current balance, never negative once committed
    pub balance: i64,
}

impl Account {
    /// Create new account
    pub fn new(id: impl Into<String>, account_type: impl Into<String>, balance: i64) -> Self {
        Self {
            id: AccountId::new(id),
            account_type: account_type.into(),
            balance,
        }
    }

    /// Balance after removing `value`, rejecting overdraft
    pub fn debited(&self, value: i64) -> crate::Result<i64> {
        if self.balance < value {
            return Err(crate::Error::FailedPrecondition(format!(
                "client account {} has insufficient funds",
                self.id
            )));
        }

        self.balance
            .checked_sub(value)
            .ok_or_else(|| crate::Error::Overflow {
                account: self.id.to_string(),
                balance: self.balance,
                value,
            })
    }

    /// Balance after adding `value`, rejecting overflow
    pub fn credited(&self, value: i64) -> crate::Result<i64> {
        self.balance
            .checked_add(value)
            .ok_or_else(|| crate::Error::Overflow {
                account: self.id.to_string(),
                balance: self.balance,
                value,
            })
    }
}

/// Immutable record of one successful transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID (also its world-state key)
    #[serde(rename = "TXID")]
    pub tx_id: TxId,

    /// Sender account
    pub from: AccountId,

    /// Recipient account
    pub to: AccountId,

    /// Transferred value
    pub value: i64,
}

/// Payload of the `Transfer` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Sender account
    pub from: AccountId,

    /// Recipient account
    pub to: AccountId,

    /// Transferred value
    pub value: i64,
}

/// Named event handed to the event sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Event name
    pub name: String,

    /// Encoded payload
    pub payload: Vec<u8>,
}
