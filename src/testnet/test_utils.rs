//! Test utilities for ledger testing

use crate::config::Config;
use crate::core::{Block, Blockchain, MineOutcome};
use crate::error::Result;
use tempfile::TempDir;

/// Config tuned for fast tests: shallow proof-of-work and no cooldown
pub fn fast_config() -> Config {
    Config {
        difficulty: 2,
        mining_cooldown_secs: 0,
        ..Config::default()
    }
}

/// In-memory ledger with `fast_config`
pub fn new_test_blockchain() -> Blockchain {
    Blockchain::new(fast_config()).expect("fast_config is valid")
}

/// File-backed ledger living in a fresh temporary directory
pub fn create_test_blockchain() -> Result<(Blockchain, TempDir)> {
    let temp_dir = tempfile::tempdir()?;
    let config = Config {
        data_file: temp_dir.path().join("blockchain.json"),
        ..fast_config()
    };
    let blockchain = Blockchain::open(config)?;
    Ok((blockchain, temp_dir))
}

/// Mine one block and return it, panicking if the request was throttled
pub fn mine(blockchain: &mut Blockchain, miner: Option<&str>) -> Block {
    match blockchain.mine_block(miner).expect("mining should succeed") {
        MineOutcome::Mined(block) => block,
        MineOutcome::Throttled { retry_after } => {
            panic!("mining throttled for {retry_after:?} in a zero-cooldown test")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_blockchain_persists() {
        let (mut blockchain, dir) = create_test_blockchain().unwrap();
        mine(&mut blockchain, None);
        assert!(dir.path().join("blockchain.json").exists());
    }
}
