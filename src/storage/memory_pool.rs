use crate::core::Transaction;

/// Open transactions waiting to be mined, in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPool {
    inner: Vec<Transaction>,
}

impl MemoryPool {
    pub fn new() -> MemoryPool {
        MemoryPool { inner: Vec::new() }
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> MemoryPool {
        MemoryPool {
            inner: transactions,
        }
    }

    pub fn add(&mut self, tx: Transaction) {
        self.inner.push(tx);
    }

    /// Drop the most recently added transaction
    pub fn pop(&mut self) -> Option<Transaction> {
        self.inner.pop()
    }

    pub fn get_all(&self) -> &[Transaction] {
        self.inner.as_slice()
    }

    /// Total amount `sender` has waiting in the pool
    pub fn pending_outgoing(&self, sender: &str) -> f64 {
        self.inner
            .iter()
            .filter(|tx| tx.get_sender() == sender)
            .map(|tx| tx.get_amount())
            .sum()
    }

    /// Empty the pool, handing back what it held
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.inner)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
