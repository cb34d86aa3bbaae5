//! Error types for the token contract

use thiserror::Error;

/// Result type for contract operations
pub type Result<T> = std::result::Result<T, Error>;

/// Status code surfaced to the host for a failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied arguments that can never succeed
    InvalidArgument,
    /// Account or transaction is missing or unreadable
    NotFound,
    /// Current ledger state does not allow the operation
    FailedPrecondition,
    /// Adapter, encoding or host failure
    Internal,
}

impl ErrorKind {
    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::FailedPrecondition => "failed_precondition",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Contract errors
#[derive(Error, Debug)]
pub enum Error {
    /// Self-transfer, negative value, malformed seed set
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Account or transaction absent from world state
    #[error("Not found: {0}")]
    NotFound(String),

    /// Insufficient funds and similar state-dependent rejections
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// Balance arithmetic left the i64 range
    #[error("Arithmetic overflow: account {account} balance {balance} cannot absorb {value}")]
    Overflow {
        /// Account whose balance would overflow
        account: String,
        /// Balance before the operation
        balance: i64,
        /// Value being applied
        value: i64,
    },

    /// Stored bytes are not a valid record
    #[error("Failed to decode record at key {key}: {message}")]
    Decode {
        /// World-state key that held the bytes
        key: String,
        /// Decoder message
        message: String,
    },

    /// Record could not be encoded
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// World-state adapter failure
    #[error("World state error: {0}")]
    Storage(String),

    /// Event emitter adapter failure
    #[error("Event error: {0}")]
    Event(String),

    /// Host contract violation (duplicate transaction id, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map onto the status code reported to the host
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::NotFound(_) | Error::Decode { .. } => ErrorKind::NotFound,
            Error::FailedPrecondition(_) | Error::Overflow { .. } => ErrorKind::FailedPrecondition,
            Error::Encode(_) | Error::Storage(_) | Error::Event(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::Decode {
                key: "k".into(),
                message: "eof".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::Overflow {
                account: "a".into(),
                balance: i64::MAX,
                value: 1
            }
            .kind(),
            ErrorKind::FailedPrecondition
        );
        assert_eq!(Error::Event("closed".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_decode_message_is_populated() {
        let err = Error::Decode {
            key: "TestUser".into(),
            message: "expected value at line 1 column 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("TestUser"));
        assert!(msg.contains("expected value"));
    }
}
