use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ledger-chain")]
pub struct Opt {
    #[arg(long = "data-file", global = true, help = "Ledger file to load and save")]
    pub data_file: Option<PathBuf>,
    #[arg(long = "owner", global = true, help = "Default sender and miner")]
    pub owner: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "add-transaction", about = "Queue a transfer for the next block")]
    AddTransaction {
        #[arg(help = "Who receives the amount")]
        recipient: String,
        #[arg(help = "Amount to transfer", allow_negative_numbers = true)]
        amount: f64,
        #[arg(long = "sender", help = "Who pays (defaults to the owner)")]
        sender: Option<String>,
    },
    #[command(name = "mine", about = "Mine the open transactions into a new block")]
    Mine {
        #[arg(long = "miner", help = "Who receives the reward (defaults to the owner)")]
        miner: Option<String>,
    },
    #[command(name = "balance", about = "Show the confirmed balance of a participant")]
    Balance {
        #[arg(help = "Participant name")]
        participant: String,
    },
    #[command(name = "participants", about = "List everyone seen on the ledger")]
    Participants,
    #[command(name = "print-chain", about = "Print all blocks with their hashes")]
    PrintChain,
    #[command(name = "verify-chain", about = "Check every link and proof in the chain")]
    VerifyChain,
    #[command(
        name = "verify-transactions",
        about = "Check that every open transaction is still affordable"
    )]
    VerifyTransactions,
    #[command(name = "reward", about = "Show the reward for the next block")]
    Reward,
    #[command(name = "tamper", about = "Corrupt a block to demonstrate integrity checks")]
    Tamper {
        #[arg(default_value_t = 1, help = "Index of the block to overwrite")]
        index: usize,
    },
}
