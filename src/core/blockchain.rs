// This is the ledger engine - it owns the chain, the open transactions and the
// bookkeeping around them (participants, per-miner reward counts, throttling)
// Every mutation goes through a method here, and every mutation is saved straight away

use crate::config::{BalancePolicy, Config};
use crate::core::monetary::dynamic_reward;
use crate::core::{Block, ChainFault, ProofOfWork, Transaction, Verification, MINING_SENDER};
use crate::error::{BlockchainError, Result};
use crate::storage::{JsonFileStore, LedgerSnapshot, MemoryPool};
use crate::utils::current_timestamp;
use log::{error, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Result of a mining request
#[derive(Debug, Clone, PartialEq)]
pub enum MineOutcome {
    /// A new block was appended
    Mined(Block),
    /// The cooldown since the last block has not passed yet; nothing changed
    Throttled { retry_after: Duration },
}

/// Breakdown of a participant's confirmed balance
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceDetails {
    pub participant: String,
    pub received: f64,
    pub sent: f64,
    pub balance: f64,
}

pub struct Blockchain {
    chain: Vec<Block>,
    mempool: MemoryPool,
    participants: BTreeSet<String>,
    mined_blocks_count: BTreeMap<String, u64>,
    owner: String,
    // wall-clock seconds of the newest mined block, so the cooldown survives a reload
    last_mined_time: Option<f64>,
    config: Config,
    verifier: Verification,
    store: Option<JsonFileStore>,
}

impl Blockchain {
    // When I just want a fresh chain in memory (tests, demos) - nothing is written to disk
    pub fn new(config: Config) -> Result<Blockchain> {
        config.validate()?;
        let verifier = Verification::new(ProofOfWork::new(config.difficulty));
        Ok(Blockchain {
            chain: vec![Block::generate_genesis_block()?],
            mempool: MemoryPool::new(),
            participants: BTreeSet::new(),
            mined_blocks_count: BTreeMap::new(),
            owner: config.owner.clone(),
            last_mined_time: None,
            config,
            verifier,
            store: None,
        })
    }

    // When I want the ledger backed by the JSON file named in the config
    pub fn open(config: Config) -> Result<Blockchain> {
        let store = JsonFileStore::new(config.data_file.clone());
        let mut blockchain = Self::new(config)?;
        blockchain.store = Some(store);
        blockchain.load_data();
        Ok(blockchain)
    }

    /// Rebuild a ledger from its serialized form. Nothing is persisted.
    pub fn deserialize(config: Config, data: &str) -> Result<Blockchain> {
        let snapshot = LedgerSnapshot::from_json(data)?;
        let mut blockchain = Self::new(config)?;
        blockchain.restore(snapshot);
        Ok(blockchain)
    }

    pub fn serialize(&self) -> Result<String> {
        self.snapshot().to_json()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            chain: self.chain.clone(),
            open_transactions: self.mempool.get_all().to_vec(),
            participants: self.participants.clone(),
            mined_blocks_count: self.mined_blocks_count.clone(),
        }
    }

    fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.chain = snapshot.chain;
        self.mempool = self.screen_open_transactions(snapshot.open_transactions);
        self.mined_blocks_count = snapshot.mined_blocks_count;
        // Stored participants may be stale, so I top them up from the data itself
        self.participants = snapshot.participants;
        self.collect_participants();
        self.last_mined_time = self
            .chain
            .last()
            .filter(|block| !block.is_genesis())
            .map(|block| block.get_timestamp());
    }

    /// Keep only the stored open transactions that `add_transaction` would
    /// accept against the restored chain, in their original order
    fn screen_open_transactions(&self, stored: Vec<Transaction>) -> MemoryPool {
        let mut pool = MemoryPool::new();
        for tx in stored {
            let amount = tx.get_amount();
            let blank = tx.get_sender().trim().is_empty() || tx.get_recipient().trim().is_empty();
            if blank || !(amount > 0.0) {
                warn!("Dropping malformed stored transaction {tx}");
                continue;
            }
            let mut available = self.get_balance(tx.get_sender());
            if self.config.balance_policy == BalancePolicy::PendingAware {
                available -= pool.pending_outgoing(tx.get_sender());
            }
            if !Verification::transaction_is_affordable(&tx, |_| available) {
                warn!("Dropping stored transaction {tx}: sender only has {available}");
                continue;
            }
            pool.add(tx);
        }
        pool
    }

    fn reset_to_genesis(&mut self) -> Result<()> {
        self.chain = vec![Block::generate_genesis_block()?];
        self.mempool.clear();
        self.participants.clear();
        self.mined_blocks_count.clear();
        self.last_mined_time = None;
        Ok(())
    }

    /// Replace the in-memory state with what the store holds. Missing, blank or
    /// unreadable data leaves a genesis-only ledger instead of failing.
    pub fn load_data(&mut self) {
        let loaded = match &self.store {
            Some(store) => store.load(),
            None => Ok(None),
        };
        match loaded {
            Ok(Some(snapshot)) => self.restore(snapshot),
            Ok(None) => {
                info!("No stored ledger found, starting from genesis");
                self.reset_in_place();
            }
            Err(e) => {
                warn!("Could not load ledger ({e}), starting from genesis");
                self.reset_in_place();
            }
        }
    }

    fn reset_in_place(&mut self) {
        if let Err(e) = self.reset_to_genesis() {
            error!("Failed to create genesis block: {e}");
        }
    }

    /// Persist the current state. Failures are logged and otherwise ignored.
    pub fn save_data(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.snapshot()) {
                error!("Saving ledger to {} failed: {e}", store.path().display());
            }
        }
    }

    pub fn chain(&self) -> &[Block] {
        self.chain.as_slice()
    }

    pub fn last_block(&self) -> &Block {
        // the chain always holds at least the genesis block
        &self.chain[self.chain.len() - 1]
    }

    pub fn open_transactions(&self) -> &[Transaction] {
        self.mempool.get_all()
    }

    pub fn list_participants(&self) -> &BTreeSet<String> {
        &self.participants
    }

    pub fn owner(&self) -> &str {
        self.owner.as_str()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn verifier(&self) -> &Verification {
        &self.verifier
    }

    pub fn mined_blocks_count(&self, miner: &str) -> u64 {
        self.mined_blocks_count.get(miner).copied().unwrap_or(0)
    }

    // Balances only look at confirmed blocks - open transactions don't count yet
    pub fn get_balance(&self, participant: &str) -> f64 {
        let (received, sent) = self.confirmed_totals(participant);
        received - sent
    }

    fn confirmed_totals(&self, participant: &str) -> (f64, f64) {
        let mut received = 0.0;
        let mut sent = 0.0;
        for tx in self.chain.iter().flat_map(|block| block.get_transactions()) {
            if tx.get_recipient() == participant {
                received += tx.get_amount();
            }
            if tx.get_sender() == participant {
                sent += tx.get_amount();
            }
        }
        (received, sent)
    }

    pub fn get_balance_details(&self, participant: &str) -> Result<BalanceDetails> {
        if !self.participants.contains(participant) {
            return Err(BlockchainError::UnknownParticipant(participant.to_string()));
        }
        let (received, sent) = self.confirmed_totals(participant);
        info!("Balance of {participant}: received {received}, sent {sent}");
        Ok(BalanceDetails {
            participant: participant.to_string(),
            received,
            sent,
            balance: received - sent,
        })
    }

    /// Balance a new transfer from `sender` is judged against
    fn spendable_balance(&self, sender: &str) -> f64 {
        match self.config.balance_policy {
            BalancePolicy::Confirmed => self.get_balance(sender),
            BalancePolicy::PendingAware => {
                self.get_balance(sender) - self.mempool.pending_outgoing(sender)
            }
        }
    }

    /// Re-check every open transaction under the configured policy
    pub fn verify_open_transactions(&self) -> bool {
        let open = self.mempool.get_all();
        match self.config.balance_policy {
            BalancePolicy::Confirmed => Verification::all_transactions_valid(
                |tx| Verification::transaction_is_affordable(tx, |s| self.get_balance(s)),
                open,
            ),
            BalancePolicy::PendingAware => Verification::all_transactions_valid(
                |tx| {
                    Verification::transaction_is_affordable(tx, |s| {
                        self.get_balance(s) - self.mempool.pending_outgoing(s) + tx.get_amount()
                    })
                },
                open,
            ),
        }
    }

    pub fn add_transaction(
        &mut self,
        recipient: &str,
        sender: Option<&str>,
        amount: f64,
    ) -> Result<()> {
        self.ensure_intact()?;
        let sender = sender.unwrap_or(self.owner.as_str()).to_string();

        if sender.trim().is_empty() {
            return Err(BlockchainError::EmptyIdentifier("sender"));
        }
        if recipient.trim().is_empty() {
            return Err(BlockchainError::EmptyIdentifier("recipient"));
        }
        // written this way round so NaN is rejected too
        if !(amount > 0.0) {
            warn!("Rejected transaction from {sender}: amount {amount} is not positive");
            return Err(BlockchainError::NonPositiveAmount(amount));
        }

        let tx = Transaction::new(&sender, recipient, amount);
        let available = self.spendable_balance(&sender);
        if !Verification::transaction_is_affordable(&tx, |_| available) {
            warn!("Rejected transaction from {sender}: needs {amount}, has {available}");
            return Err(BlockchainError::InsufficientFunds {
                sender,
                required: amount,
                available,
            });
        }

        self.mempool.add(tx);
        if !self.verify_open_transactions() {
            self.mempool.pop();
            error!("Open transactions no longer verify, dropped the new one");
            return Err(BlockchainError::PendingTransactionsInvalid);
        }

        self.participants.insert(sender.clone());
        self.participants.insert(recipient.to_string());
        info!("Queued transaction {sender} -> {recipient}: {amount}");
        self.save_data();
        Ok(())
    }

    pub fn get_dynamic_reward(&self) -> f64 {
        dynamic_reward(
            self.chain.len(),
            self.config.base_reward,
            self.config.halving_interval,
        )
    }

    pub fn mine_block(&mut self, miner: Option<&str>) -> Result<MineOutcome> {
        self.ensure_intact()?;
        let miner = miner.unwrap_or(self.owner.as_str()).to_string();
        if miner.trim().is_empty() {
            return Err(BlockchainError::EmptyIdentifier("miner"));
        }

        // I don't let anyone mine back-to-back: a second request inside the
        // cooldown is a soft no-op, not an error
        let cooldown = self.config.mining_cooldown_secs as f64;
        if let Some(last) = self.last_mined_time {
            // a clock that went backwards counts as no time passed
            let elapsed = (current_timestamp()? - last).max(0.0);
            if elapsed < cooldown {
                let retry_after = Duration::from_secs_f64(cooldown - elapsed);
                warn!(
                    "Mining throttled, try again in {:.1}s",
                    retry_after.as_secs_f64()
                );
                return Ok(MineOutcome::Throttled { retry_after });
            }
        }

        let mut candidate_transactions = self.mempool.get_all().to_vec();
        let mined_so_far = self.mined_blocks_count(&miner);
        let reward = self.get_dynamic_reward();
        let rewarded = if mined_so_far >= self.config.reward_cap {
            warn!(
                "{miner} reached the cap of {} rewarded blocks, mining without reward",
                self.config.reward_cap
            );
            false
        } else if !(reward > 0.0) {
            info!("Block reward has run out, mining without reward");
            false
        } else {
            candidate_transactions.push(Transaction::new_reward(&miner, reward));
            true
        };

        let previous_hash = self.last_block().hash();
        let index = self.chain.len() as u64;
        info!(
            "Mining block {index} with {} transactions for {miner}",
            candidate_transactions.len()
        );
        let proof = self
            .verifier
            .proof_of_work()
            .search(&candidate_transactions, &previous_hash);
        let block = Block::new_block(index, previous_hash, candidate_transactions, proof, None)?;

        // Nothing below can fail, so the append, the counter and the cleared
        // mempool land together
        self.chain.push(block.clone());
        if rewarded {
            *self.mined_blocks_count.entry(miner.clone()).or_insert(0) += 1;
            self.participants.insert(MINING_SENDER.to_string());
            self.participants.insert(miner.clone());
        }
        for tx in self.mempool.drain() {
            self.participants.insert(tx.get_sender().to_string());
            self.participants.insert(tx.get_recipient().to_string());
        }
        self.last_mined_time = Some(block.get_timestamp());
        info!("Mined block {index} with proof {proof}: {}", block.hash());
        self.save_data();
        Ok(MineOutcome::Mined(block))
    }

    pub fn find_fault(&self) -> Option<ChainFault> {
        self.verifier.find_fault(&self.chain)
    }

    pub fn chain_is_valid(&self) -> bool {
        self.verifier.chain_is_valid(&self.chain)
    }

    /// Refuse to go on once the chain stops verifying
    pub fn ensure_intact(&self) -> Result<()> {
        match self.find_fault() {
            Some(fault) => {
                error!("Refusing to build on a compromised chain: {fault}");
                Err(BlockchainError::Integrity(fault))
            }
            None => Ok(()),
        }
    }

    /// Overwrite a block's transactions without re-mining it. This breaks the
    /// chain on purpose so the integrity check has something to catch.
    pub fn tamper_block(&mut self, index: usize, transactions: Vec<Transaction>) -> Result<()> {
        if index == 0 {
            return Err(BlockchainError::InvalidBlock(
                "The genesis block cannot be altered".to_string(),
            ));
        }
        let len = self.chain.len();
        let block = self.chain.get_mut(index).ok_or_else(|| {
            BlockchainError::InvalidBlock(format!(
                "No block at index {index} (chain has {len} blocks)"
            ))
        })?;
        block.replace_transactions(transactions);
        warn!("Block {index} manipulated");
        self.rebuild_participants();
        self.save_data();
        Ok(())
    }

    /// Recompute participants from the chain and the open transactions
    pub fn rebuild_participants(&mut self) {
        self.participants.clear();
        self.collect_participants();
    }

    fn collect_participants(&mut self) {
        let transactions = self
            .chain
            .iter()
            .flat_map(|block| block.get_transactions())
            .chain(self.mempool.get_all());
        for tx in transactions {
            self.participants.insert(tx.get_sender().to_string());
            self.participants.insert(tx.get_recipient().to_string());
        }
    }
}
