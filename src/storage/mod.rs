//! Data storage and persistence
//!
//! The ordered pool of open transactions and the JSON file the ledger is
//! saved to between runs.

pub mod memory_pool;
pub mod persistence;

pub use memory_pool::MemoryPool;
pub use persistence::{JsonFileStore, LedgerSnapshot};
