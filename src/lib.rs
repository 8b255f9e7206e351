//! # Ledger Chain - a single-process educational blockchain
//!
//! An append-only chain of blocks, each linked to its predecessor by hash and
//! sealed with a brute-force proof of work, carrying plain value transfers
//! between named participants. Balances are computed over the whole confirmed
//! history.
//!
//! ## How the code is organized
//! - `core/`: blocks, transactions, proof of work, chain verification, the
//!   reward schedule and the `Blockchain` engine
//! - `storage/`: the ordered pool of open transactions and the JSON ledger file
//! - `config/`: ledger parameters from defaults, TOML and environment
//! - `utils/`: SHA-256 hashing and the canonical encoding digests are taken over
//! - `cli/`: argument parsing for the binary
//!
//! ## Typical flow
//! 1. `add_transaction` checks the sender can afford the amount and queues it
//! 2. `mine_block` adds a reward, solves the puzzle and appends the block
//! 3. `chain_is_valid` after every mutation catches tampering
//!
//! There is no networking and no key material: senders and recipients are
//! plain names.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{BalancePolicy, Config, GLOBAL_CONFIG};
pub use core::{
    BalanceDetails, Block, Blockchain, ChainFault, MineOutcome, ProofOfWork, Transaction,
    Verification, MINING_SENDER,
};
pub use error::{BlockchainError, Result};
pub use storage::{JsonFileStore, LedgerSnapshot, MemoryPool};
pub use utils::{canonical_json, current_timestamp, digest, hash_hex, sha256_digest};
