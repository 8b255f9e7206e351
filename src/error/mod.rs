//! Error handling for the ledger
//!
//! Errors fall into three groups: validation failures (the operation is rejected
//! and nothing changes), integrity failures (the chain no longer verifies) and
//! persistence failures (reading or writing the ledger file).

use crate::core::ChainFault;
use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Error types for ledger operations
#[derive(Debug, Clone, PartialEq)]
pub enum BlockchainError {
    /// Transaction amount was zero or negative
    NonPositiveAmount(f64),
    /// Sender cannot cover the amount
    InsufficientFunds {
        sender: String,
        required: f64,
        available: f64,
    },
    /// A sender or recipient identifier was blank
    EmptyIdentifier(&'static str),
    /// Balance details requested for someone never seen on the ledger
    UnknownParticipant(String),
    /// Re-checking the mempool found a transaction that is no longer affordable
    PendingTransactionsInvalid,
    /// The chain failed verification
    Integrity(ChainFault),
    /// Block lookup or block-level operation errors
    InvalidBlock(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
}

impl BlockchainError {
    /// True for rejections that leave the ledger untouched and can be retried
    /// with different input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BlockchainError::NonPositiveAmount(_)
                | BlockchainError::InsufficientFunds { .. }
                | BlockchainError::EmptyIdentifier(_)
                | BlockchainError::UnknownParticipant(_)
                | BlockchainError::PendingTransactionsInvalid
        )
    }
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive, got {amount}")
            }
            BlockchainError::InsufficientFunds {
                sender,
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds for {sender}: required {required}, available {available}"
                )
            }
            BlockchainError::EmptyIdentifier(field) => write!(f, "The {field} must not be empty"),
            BlockchainError::UnknownParticipant(name) => write!(f, "Unknown participant: {name}"),
            BlockchainError::PendingTransactionsInvalid => {
                write!(f, "Open transactions failed re-verification")
            }
            BlockchainError::Integrity(fault) => write!(f, "Chain integrity error: {fault}"),
            BlockchainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BlockchainError {
    fn from(err: serde_json::Error) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BlockchainError {
    fn from(err: toml::de::Error) -> Self {
        BlockchainError::Config(err.to_string())
    }
}

impl From<ChainFault> for BlockchainError {
    fn from(fault: ChainFault) -> Self {
        BlockchainError::Integrity(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(BlockchainError::NonPositiveAmount(0.0).is_validation());
        assert!(BlockchainError::UnknownParticipant("Bob".to_string()).is_validation());
        assert!(!BlockchainError::Integrity(ChainFault::LinkMismatch { index: 2 }).is_validation());
        assert!(!BlockchainError::Io("disk full".to_string()).is_validation());
    }

    #[test]
    fn test_display_messages() {
        let err = BlockchainError::InsufficientFunds {
            sender: "Alice".to_string(),
            required: 5.0,
            available: 2.5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds for Alice: required 5, available 2.5"
        );
        assert_eq!(
            BlockchainError::EmptyIdentifier("recipient").to_string(),
            "The recipient must not be empty"
        );
    }
}
