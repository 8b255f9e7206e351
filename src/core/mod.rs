//! Core ledger functionality
//!
//! Blocks, transactions, the proof-of-work puzzle, chain verification, the
//! reward schedule and the ledger engine that ties them together.

pub mod block;
pub mod blockchain;
pub mod monetary;
pub mod proof_of_work;
pub mod transaction;
pub mod verification;

pub use block::{Block, BlockRecord};
pub use blockchain::{BalanceDetails, Blockchain, MineOutcome};
pub use monetary::{dynamic_reward, BASE_REWARD, HALVING_INTERVAL, REWARD_CAP};
pub use proof_of_work::ProofOfWork;
pub use transaction::{Transaction, MINING_SENDER};
pub use verification::{ChainFault, Verification};
