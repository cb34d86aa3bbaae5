//! Token Ledger Contract
//!
//! Transactional core of a token-ledger smart contract, run once per host
//! invocation against the host's world state.
//!
//! # Architecture
//!
//! - **Explicit context**: every entry point receives a [`TransactionContext`]
//!   carrying world state, event emission and the transaction ID
//! - **Rich records**: accounts and transactions are JSON objects behind [`Codec`]
//! - **Host atomicity**: the host commits all writes of an invocation or none
//!
//! # Invariants
//!
//! - Conservation: a transfer never changes the sum of the two balances
//! - Non-negativity: no committed balance is below zero
//! - One `Transfer` event and one transaction record per successful transfer

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod codec;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod memory;
pub mod types;

// Re-exports
pub use codec::{Codec, JsonCodec};
pub use config::{ContractConfig, SeedAccount};
pub use context::{EventSink, Stub, TransactionContext, WorldState};
pub use contract::TokenContract;
pub use error::{Error, ErrorKind, Result};
pub use types::{
    Account, AccountId, EmittedEvent, Transaction, TransferEvent, TxId, TRANSFER_EVENT,
};
