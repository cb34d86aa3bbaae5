//! Record encoding for world-state values
//!
//! Only the structured JSON representation is implemented. Deployments that
//! stored bare base-10 balance strings per key are not readable through this
//! codec; such a value fails with [`Error::Decode`].

use crate::{
    types::{Account, Transaction, TransferEvent},
    Error, Result,
};
use serde::de::DeserializeOwned;

/// Encodes and decodes ledger records
pub trait Codec {
    /// Encode an account
    fn encode_account(&self, account: &Account) -> Result<Vec<u8>>;

    /// Decode the account stored at `key`
    fn decode_account(&self, key: &str, bytes: &[u8]) -> Result<Account>;

    /// Encode a transaction record
    fn encode_transaction(&self, transaction: &Transaction) -> Result<Vec<u8>>;

    /// Decode the transaction stored at `key`
    fn decode_transaction(&self, key: &str, bytes: &[u8]) -> Result<Transaction>;

    /// Encode a transfer event payload
    fn encode_event(&self, event: &TransferEvent) -> Result<Vec<u8>>;

    /// Decode a transfer event payload
    fn decode_event(&self, bytes: &[u8]) -> Result<TransferEvent>;
}

/// UTF-8 JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| Error::Decode {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

impl Codec for JsonCodec {
    fn encode_account(&self, account: &Account) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(account)?)
    }

    fn decode_account(&self, key: &str, bytes: &[u8]) -> Result<Account> {
        let account: Account = Self::decode(key, bytes)?;

        if account.balance < 0 {
            return Err(Error::Decode {
                key: key.to_string(),
                message: format!("negative balance {}", account.balance),
            });
        }

        if account.id.as_str() != key {
            return Err(Error::Decode {
                key: key.to_string(),
                message: format!("record id {} does not match key", account.id),
            });
        }

        Ok(account)
    }

    fn encode_transaction(&self, transaction: &Transaction) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(transaction)?)
    }

    fn decode_transaction(&self, key: &str, bytes: &[u8]) -> Result<Transaction> {
        Self::decode(key, bytes)
    }

    fn encode_event(&self, event: &TransferEvent) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(event)?)
    }

    fn decode_event(&self, bytes: &[u8]) -> Result<TransferEvent> {
        Self::decode("<event>", bytes)
    }
}
