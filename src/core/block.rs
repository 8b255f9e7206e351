use crate::core::Transaction;
use crate::error::{BlockchainError, Result};
use crate::utils::{current_timestamp, digest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `previous_hash` stored in the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";
/// Proof stored in the genesis block
pub const GENESIS_PROOF: u64 = 100;

/// Decimal places used when a timestamp is written out
const TIME_PRECISION: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BlockRecord", try_from = "BlockRecord")]
pub struct Block {
    index: u64,
    previous_hash: String,
    transactions: Vec<Transaction>,
    proof: u64,
    timestamp: f64,
}

/// On-disk and hashing shape of a block. The timestamp travels as a
/// fixed-precision string so the digest survives a save/load cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRecord {
    pub index: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub time: String,
}

impl Block {
    pub fn new_block(
        index: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
        proof: u64,
        timestamp: Option<f64>,
    ) -> Result<Block> {
        let timestamp = match timestamp {
            Some(ts) => ts,
            None => current_timestamp()?,
        };
        Ok(Block {
            index,
            previous_hash,
            transactions,
            proof,
            timestamp,
        })
    }

    pub fn generate_genesis_block() -> Result<Block> {
        Block::new_block(
            0,
            GENESIS_PREVIOUS_HASH.to_string(),
            Vec::new(),
            GENESIS_PROOF,
            None,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
            && self.previous_hash == GENESIS_PREVIOUS_HASH
            && self.transactions.is_empty()
            && self.proof == GENESIS_PROOF
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_proof(&self) -> u64 {
        self.proof
    }

    pub fn get_timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn formatted_time(&self) -> String {
        format!("{:.*}", TIME_PRECISION, self.timestamp)
    }

    /// Digest of this block's canonical record
    pub fn hash(&self) -> String {
        digest(&self.to_record())
    }

    pub fn to_record(&self) -> BlockRecord {
        BlockRecord {
            index: self.index,
            previous_hash: self.previous_hash.clone(),
            transactions: self.transactions.clone(),
            proof: self.proof,
            time: self.formatted_time(),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "index": self.index,
            "previous_hash": self.previous_hash,
            "transactions": self.transactions.iter().map(Transaction::to_value).collect::<Vec<_>>(),
            "proof": self.proof,
            "time": self.formatted_time(),
        })
    }

    pub fn from_value(value: serde_json::Value) -> Result<Block> {
        Ok(serde_json::from_value(value)?)
    }

    /// Overwrite the transaction list without touching the proof or any hash.
    /// Only the tamper demonstration calls this.
    pub(crate) fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        let time = block.formatted_time();
        BlockRecord {
            index: block.index,
            previous_hash: block.previous_hash,
            transactions: block.transactions,
            proof: block.proof,
            time,
        }
    }
}

impl TryFrom<BlockRecord> for Block {
    type Error = BlockchainError;

    fn try_from(record: BlockRecord) -> Result<Block> {
        let timestamp = record.time.trim().parse::<f64>().map_err(|e| {
            BlockchainError::Serialization(format!(
                "Invalid block time '{}' at index {}: {e}",
                record.time, record.index
            ))
        })?;
        if !timestamp.is_finite() {
            return Err(BlockchainError::Serialization(format!(
                "Non-finite block time at index {}",
                record.index
            )));
        }
        Ok(Block {
            index: record.index,
            previous_hash: record.previous_hash,
            transactions: record.transactions,
            proof: record.proof,
            timestamp,
        })
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(index={}, proof={}, time={:.4}, transactions_count={})",
            self.index,
            self.proof,
            self.timestamp,
            self.transactions.len()
        )
    }
}
