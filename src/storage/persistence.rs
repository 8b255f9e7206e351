// JSON file persistence for the ledger. The file holds the whole state in one
// document; writes go to a sibling temp file first and are renamed into place
// so a crash mid-write leaves the previous state readable.

use crate::core::{Block, Transaction};
use crate::error::{BlockchainError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the ledger persists between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub chain: Vec<Block>,
    pub open_transactions: Vec<Transaction>,
    pub participants: BTreeSet<String>,
    pub mined_blocks_count: BTreeMap<String, u64>,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and sanity check a snapshot. The chain must start with a
    /// genesis block and every block must sit at its own index.
    pub fn from_json(data: &str) -> Result<LedgerSnapshot> {
        let snapshot: LedgerSnapshot = serde_json::from_str(data)?;
        snapshot.check_shape()?;
        Ok(snapshot)
    }

    fn check_shape(&self) -> Result<()> {
        match self.chain.first() {
            Some(genesis) if genesis.is_genesis() => {}
            Some(_) => {
                return Err(BlockchainError::Serialization(
                    "First stored block is not a genesis block".to_string(),
                ))
            }
            None => {
                return Err(BlockchainError::Serialization(
                    "Stored chain is empty".to_string(),
                ))
            }
        }
        for (position, block) in self.chain.iter().enumerate() {
            if block.get_index() != position as u64 {
                return Err(BlockchainError::Serialization(format!(
                    "Block at position {position} claims index {}",
                    block.get_index()
                )));
            }
        }
        Ok(())
    }
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// `Ok(None)` when there is nothing stored yet (missing or blank file)
    pub fn load(&self) -> Result<Option<LedgerSnapshot>> {
        if !self.path.exists() {
            debug!("No ledger file at {}", self.path.display());
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(None);
        }
        let snapshot = LedgerSnapshot::from_json(&data)?;
        info!(
            "Loaded {} blocks and {} open transactions from {}",
            snapshot.chain.len(),
            snapshot.open_transactions.len(),
            self.path.display()
        );
        Ok(Some(snapshot))
    }

    pub fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = snapshot.to_json()?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Saved ledger to {}", self.path.display());
        Ok(())
    }
}
