//! Token Ledger Host
//!
//! Local host runtime for the token contract: RocksDB world state, one
//! invocation at a time, all-or-nothing commits.
//!
//! # Architecture
//!
//! - **Single Writer**: one actor task runs every invocation in order
//! - **Staging**: writes and events stay in an [`scope::InvocationScope`] until commit
//! - **Atomic Commit**: state writes and the receipt land in one `WriteBatch`
//! - **Receipts**: events emitted by each committed invocation, keyed by tx id

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod actor;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod scope;
pub mod storage;
pub mod types;

// Re-exports
pub use actor::HostHandle;
pub use config::Config;
pub use error::{Error, Result};
pub use host::LedgerHost;
pub use metrics::Metrics;
pub use storage::Storage;
pub use types::{ChangeSet, Receipt};
