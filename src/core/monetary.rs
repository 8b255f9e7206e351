//! Reward schedule for mined blocks
//!
//! The reward starts at `BASE_REWARD` and halves every `HALVING_INTERVAL`
//! blocks of chain length. Each identity can collect at most
//! `REWARD_CAP` rewards over its lifetime; blocks mined beyond that carry no
//! reward transaction.

/// Reward paid for the first blocks of the chain
pub const BASE_REWARD: f64 = 10.0;

/// Chain length after which the reward halves
pub const HALVING_INTERVAL: u64 = 10;

/// Maximum number of rewarded blocks per miner
pub const REWARD_CAP: u64 = 100;

/// Seconds a miner has to wait between two successful blocks
pub const MINING_COOLDOWN_SECS: u64 = 10;

/// `base_reward / 2^(chain_length / halving_interval)`, integer division in
/// the exponent. A zero interval never halves.
pub fn dynamic_reward(chain_length: usize, base_reward: f64, halving_interval: u64) -> f64 {
    if halving_interval == 0 {
        return base_reward;
    }
    let halvings = chain_length as u64 / halving_interval;
    // the quotient underflows to zero long before this
    let halvings = halvings.min(1100) as i32;
    base_reward / 2f64.powi(halvings)
}
