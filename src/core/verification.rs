//! Chain integrity and transaction affordability checks
//!
//! Both checks are independent of the ledger itself: the chain is passed in as
//! a slice and balances come from a caller-supplied function, so either check
//! can be driven with synthetic data.

use crate::core::{Block, ProofOfWork, Transaction};
use log::{error, warn};
use std::fmt;

/// First problem found while walking the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFault {
    /// `previous_hash` of the block at `index` does not match its predecessor
    LinkMismatch { index: u64 },
    /// The proof stored in the block at `index` does not solve its puzzle
    InvalidProof { index: u64 },
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFault::LinkMismatch { index } => {
                write!(f, "LINK_MISMATCH at block {index}")
            }
            ChainFault::InvalidProof { index } => write!(f, "INVALID_PROOF at block {index}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Verification {
    proof_of_work: ProofOfWork,
}

impl Verification {
    pub fn new(proof_of_work: ProofOfWork) -> Verification {
        Verification { proof_of_work }
    }

    pub fn proof_of_work(&self) -> &ProofOfWork {
        &self.proof_of_work
    }

    /// Walk the chain from block 1 and report the first broken link or proof.
    /// The genesis block is never checked.
    pub fn find_fault(&self, chain: &[Block]) -> Option<ChainFault> {
        for pair in chain.windows(2) {
            let (previous, block) = (&pair[0], &pair[1]);
            let computed = previous.hash();
            if block.get_previous_hash() != computed {
                warn!(
                    "Block {} previous_hash mismatch: stored {}, computed {}",
                    block.get_index(),
                    block.get_previous_hash(),
                    computed
                );
                return Some(ChainFault::LinkMismatch {
                    index: block.get_index(),
                });
            }
            if !self.proof_of_work.is_valid(
                block.get_transactions(),
                block.get_previous_hash(),
                block.get_proof(),
            ) {
                error!("Invalid proof of work at block {}", block.get_index());
                return Some(ChainFault::InvalidProof {
                    index: block.get_index(),
                });
            }
        }
        None
    }

    pub fn chain_is_valid(&self, chain: &[Block]) -> bool {
        self.find_fault(chain).is_none()
    }

    pub fn transaction_is_affordable<F>(tx: &Transaction, balance_fn: F) -> bool
    where
        F: Fn(&str) -> f64,
    {
        balance_fn(tx.get_sender()) >= tx.get_amount()
    }

    pub fn all_transactions_valid<F>(verify_fn: F, transactions: &[Transaction]) -> bool
    where
        F: Fn(&Transaction) -> bool,
    {
        transactions.iter().all(verify_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn mine_next(pow: &ProofOfWork, previous: &Block, transactions: Vec<Transaction>) -> Block {
        let previous_hash = previous.hash();
        let proof = pow.search(&transactions, &previous_hash);
        Block::new_block(
            previous.get_index() + 1,
            previous_hash,
            transactions,
            proof,
            None,
        )
        .unwrap()
    }

    fn build_chain(pow: &ProofOfWork, len: usize) -> Vec<Block> {
        let mut chain = vec![Block::generate_genesis_block().unwrap()];
        for i in 1..len {
            let txs = vec![Transaction::new_reward("Alice", i as f64)];
            let next = mine_next(pow, chain.last().unwrap(), txs);
            chain.push(next);
        }
        chain
    }

    #[test]
    fn test_mined_chain_is_valid() {
        let pow = ProofOfWork::new(2);
        let verifier = Verification::new(pow);
        let chain = build_chain(&pow, 4);
        assert!(verifier.chain_is_valid(&chain));
        assert_eq!(verifier.find_fault(&chain), None);
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        let verifier = Verification::default();
        let chain = vec![Block::generate_genesis_block().unwrap()];
        assert!(verifier.chain_is_valid(&chain));
        assert!(verifier.chain_is_valid(&[]));
    }

    #[test]
    fn test_tampered_block_breaks_next_link() {
        let pow = ProofOfWork::new(2);
        let verifier = Verification::new(pow);
        let mut chain = build_chain(&pow, 4);
        chain[1].replace_transactions(vec![Transaction::new("Hacker", "Evil", 9999.0)]);

        // block 1's own link still holds, so the first fault is whichever
        // check fails first for block 1 or its successor
        let fault = verifier.find_fault(&chain).unwrap();
        assert!(matches!(
            fault,
            ChainFault::InvalidProof { index: 1 } | ChainFault::LinkMismatch { index: 2 }
        ));
        assert!(!verifier.chain_is_valid(&chain));
    }

    #[test]
    fn test_tampered_tip_fails_proof() {
        let pow = ProofOfWork::new(3);
        let verifier = Verification::new(pow);
        let mut chain = build_chain(&pow, 3);
        let tip = chain.last().unwrap().clone();

        // the first replacement whose digest misses the target under the old proof
        let forged = (1..100)
            .map(|amount| vec![Transaction::new_reward("Mallory", amount as f64)])
            .find(|txs| !pow.is_valid(txs, tip.get_previous_hash(), tip.get_proof()))
            .expect("a 3-zero target rejects almost every input");
        chain[2].replace_transactions(forged);

        // the tip has no successor, so only its proof can catch the change
        assert_eq!(
            verifier.find_fault(&chain),
            Some(ChainFault::InvalidProof { index: 2 })
        );
    }

    #[test]
    fn test_wrong_previous_hash_is_link_mismatch() {
        let pow = ProofOfWork::new(1);
        let verifier = Verification::new(pow);
        let mut chain = build_chain(&pow, 2);
        let txs = vec![Transaction::new_reward("Bob", 1.0)];
        let proof = pow.search(&txs, "not_the_tip");
        chain.push(Block::new_block(2, "not_the_tip".to_string(), txs, proof, None).unwrap());
        assert_eq!(
            verifier.find_fault(&chain),
            Some(ChainFault::LinkMismatch { index: 2 })
        );
    }

    #[test]
    fn test_affordability_with_synthetic_balances() {
        let balances: HashMap<&str, f64> = [("Alice", 5.0), ("Bob", 0.0)].into_iter().collect();
        let balance_fn = |name: &str| balances.get(name).copied().unwrap_or(0.0);

        assert!(Verification::transaction_is_affordable(
            &Transaction::new("Alice", "Bob", 5.0),
            balance_fn
        ));
        assert!(!Verification::transaction_is_affordable(
            &Transaction::new("Alice", "Bob", 5.5),
            balance_fn
        ));
        assert!(!Verification::transaction_is_affordable(
            &Transaction::new("Bob", "Alice", 0.1),
            balance_fn
        ));
    }

    #[test]
    fn test_all_transactions_valid() {
        let txs = vec![
            Transaction::new("Alice", "Bob", 1.0),
            Transaction::new("Alice", "Carol", 2.0),
        ];
        let rich = |_: &str| 10.0;
        let broke = |_: &str| 1.5;
        assert!(Verification::all_transactions_valid(
            |tx| Verification::transaction_is_affordable(tx, rich),
            &txs
        ));
        assert!(!Verification::all_transactions_valid(
            |tx| Verification::transaction_is_affordable(tx, broke),
            &txs
        ));
        assert!(Verification::all_transactions_valid(|_| false, &[]));
    }

    #[test]
    fn test_fault_display() {
        assert_eq!(
            ChainFault::LinkMismatch { index: 3 }.to_string(),
            "LINK_MISMATCH at block 3"
        );
        assert_eq!(
            ChainFault::InvalidProof { index: 1 }.to_string(),
            "INVALID_PROOF at block 1"
        );
    }
}
