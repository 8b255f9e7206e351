//! Configuration management
//!
//! Ledger parameters (owner identity, data file, difficulty, reward schedule,
//! mining cooldown and affordability policy) with defaults that can be
//! overridden from a TOML file and environment variables.

pub mod settings;

pub use settings::{BalancePolicy, Config, GLOBAL_CONFIG};
