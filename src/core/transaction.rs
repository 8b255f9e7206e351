// A transaction moves an amount from one named participant to another.
// Identifiers are plain names, there are no keys or signatures involved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sender used on mining reward transactions. It never signs anything and its
/// balance only ever goes down.
///
/// It is not a real account, but it is still listed among the participants
/// once a reward is paid, so that the balances of all participants sum to zero.
pub const MINING_SENDER: &str = "MINING";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: f64,
}

impl Transaction {
    pub fn new(sender: &str, recipient: &str, amount: f64) -> Transaction {
        Transaction {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
        }
    }

    // Reward paid out of thin air to whoever mined the block
    pub fn new_reward(miner: &str, reward: f64) -> Transaction {
        Transaction::new(MINING_SENDER, miner, reward)
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn is_reward(&self) -> bool {
        self.sender == MINING_SENDER
    }

    /// Canonical record used on disk and as proof-of-work input
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "sender": self.sender,
            "recipient": self.recipient,
            "amount": self.amount,
        })
    }

    pub fn from_value(value: serde_json::Value) -> crate::error::Result<Transaction> {
        Ok(serde_json::from_value(value)?)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.sender, self.recipient, self.amount)
    }
}
