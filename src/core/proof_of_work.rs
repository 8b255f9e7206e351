use crate::core::Transaction;
use crate::utils::{canonical_json, hash_hex};
use log::{debug, info};

/// Leading zero hex characters a proof hash must have
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Brute-force nonce search over a transaction set and the previous block's hash.
///
/// The reward transaction is part of the set being solved, so a miner cannot
/// redirect the reward once a proof has been found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> ProofOfWork {
        ProofOfWork { difficulty }
    }

    pub fn get_difficulty(&self) -> usize {
        self.difficulty
    }

    fn prepare_data(transactions: &[Transaction], previous_hash: &str, proof: u64) -> Vec<u8> {
        let mut guess = canonical_json(transactions);
        guess.push_str(previous_hash);
        guess.push_str(&proof.to_string());
        guess.into_bytes()
    }

    /// Hex digest of the puzzle input for `proof`
    pub fn guess_hash(transactions: &[Transaction], previous_hash: &str, proof: u64) -> String {
        hash_hex(&Self::prepare_data(transactions, previous_hash, proof))
    }

    pub fn is_valid(&self, transactions: &[Transaction], previous_hash: &str, proof: u64) -> bool {
        let hash = Self::guess_hash(transactions, previous_hash, proof);
        hash.bytes().take(self.difficulty).all(|b| b == b'0')
    }

    /// Count up from zero until a proof satisfies the difficulty. Unbounded:
    /// blocks the calling thread until a solution turns up.
    pub fn search(&self, transactions: &[Transaction], previous_hash: &str) -> u64 {
        info!(
            "Searching proof for {} transactions (difficulty {})",
            transactions.len(),
            self.difficulty
        );
        let mut proof = 0;
        while !self.is_valid(transactions, previous_hash, proof) {
            proof += 1;
        }
        debug!(
            "Found proof {proof}: {}",
            Self::guess_hash(transactions, previous_hash, proof)
        );
        proof
    }
}
