use crate::core::monetary::{
    BASE_REWARD, HALVING_INTERVAL, MINING_COOLDOWN_SECS, REWARD_CAP,
};
use crate::core::proof_of_work::DEFAULT_DIFFICULTY;
use crate::error::{BlockchainError, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for the binary, resolved once from file and environment
pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(|| match Config::load() {
    Ok(config) => config,
    Err(e) => {
        warn!("Falling back to default configuration: {e}");
        Config::default()
    }
});

static DEFAULT_OWNER: &str = "Kdhungel";
static DEFAULT_DATA_FILE: &str = "data/blockchain.json";

const CONFIG_FILE_KEY: &str = "LEDGER_CONFIG";
const OWNER_KEY: &str = "LEDGER_OWNER";
const DATA_FILE_KEY: &str = "LEDGER_DATA_FILE";
const DIFFICULTY_KEY: &str = "LEDGER_DIFFICULTY";
const COOLDOWN_KEY: &str = "LEDGER_COOLDOWN_SECS";
const BALANCE_POLICY_KEY: &str = "LEDGER_BALANCE_POLICY";

/// How a new transaction's affordability is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalancePolicy {
    /// Compare against the confirmed balance only, ignoring pending transfers
    #[default]
    Confirmed,
    /// Also subtract what the sender already has waiting in the mempool
    PendingAware,
}

impl FromStr for BalancePolicy {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(BalancePolicy::Confirmed),
            "pending-aware" | "pending_aware" => Ok(BalancePolicy::PendingAware),
            _ => Err(BlockchainError::Config(format!(
                "Invalid balance policy: {s}. Valid options: confirmed, pending-aware"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default sender and miner
    pub owner: String,
    /// Where the ledger is persisted
    pub data_file: PathBuf,
    /// Leading zero hex digits required of a proof hash
    pub difficulty: usize,
    pub base_reward: f64,
    pub halving_interval: u64,
    pub reward_cap: u64,
    pub mining_cooldown_secs: u64,
    pub balance_policy: BalancePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            owner: DEFAULT_OWNER.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            difficulty: DEFAULT_DIFFICULTY,
            base_reward: BASE_REWARD,
            halving_interval: HALVING_INTERVAL,
            reward_cap: REWARD_CAP,
            mining_cooldown_secs: MINING_COOLDOWN_SECS,
            balance_policy: BalancePolicy::Confirmed,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file named by `LEDGER_CONFIG` (if any), then
    /// individual environment overrides.
    pub fn load() -> Result<Config> {
        let mut config = match env::var(CONFIG_FILE_KEY) {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) => Config::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(owner) = env::var(OWNER_KEY) {
            self.owner = owner;
        }
        if let Ok(path) = env::var(DATA_FILE_KEY) {
            self.data_file = PathBuf::from(path);
        }
        if let Ok(value) = env::var(DIFFICULTY_KEY) {
            self.difficulty = parse_env(DIFFICULTY_KEY, &value)?;
        }
        if let Ok(value) = env::var(COOLDOWN_KEY) {
            self.mining_cooldown_secs = parse_env(COOLDOWN_KEY, &value)?;
        }
        if let Ok(value) = env::var(BALANCE_POLICY_KEY) {
            self.balance_policy = value.parse()?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(BlockchainError::Config("owner must not be empty".to_string()));
        }
        if self.difficulty > 64 {
            return Err(BlockchainError::Config(format!(
                "difficulty {} exceeds the 64 hex digits of a SHA-256 digest",
                self.difficulty
            )));
        }
        if !self.base_reward.is_finite() || self.base_reward < 0.0 {
            return Err(BlockchainError::Config(format!(
                "base_reward must be a non-negative number, got {}",
                self.base_reward
            )));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BlockchainError::Config(format!("Invalid value for {key}: {value}")))
}
