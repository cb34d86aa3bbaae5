//! Error types for the ledger host

use thiserror::Error;

/// Result type for host operations
pub type Result<T> = std::result::Result<T, Error>;

/// Host errors
#[derive(Error, Debug)]
pub enum Error {
    /// Contract rejected the invocation
    #[error("Contract error: {0}")]
    Contract(#[from] token_contract::Error),

    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Receipt not found
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Status code of a contract failure, `None` for host-side failures
    pub fn contract_kind(&self) -> Option<token_contract::ErrorKind> {
        match self {
            Error::Contract(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
