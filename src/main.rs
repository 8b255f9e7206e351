// Entry point for the ledger CLI
// Each run loads the ledger file, performs one command, saves, and re-checks the chain
use clap::Parser;
use ledger_chain::{
    Blockchain, BlockchainError, Command, Config, MineOutcome, Opt, Transaction, GLOBAL_CONFIG,
};
use log::{error, LevelFilter};
use std::process;

fn main() {
    // Info level by default, RUST_LOG still wins when it is set
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    let mut config: Config = (*GLOBAL_CONFIG).clone();
    if let Some(path) = opt.data_file {
        config.data_file = path;
    }
    if let Some(owner) = opt.owner {
        config.owner = owner;
    }

    if let Err(e) = run(config, opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(config: Config, command: Command) -> Result<(), BlockchainError> {
    let mut blockchain = Blockchain::open(config)?;
    let outcome = run_command(&mut blockchain, command);

    // A compromised chain ends the session no matter what the command was
    if let Some(fault) = blockchain.find_fault() {
        display_blockchain(&blockchain);
        error!("Blockchain integrity compromised! Exiting...");
        return Err(BlockchainError::Integrity(fault));
    }
    outcome
}

fn run_command(blockchain: &mut Blockchain, command: Command) -> Result<(), BlockchainError> {
    match command {
        Command::AddTransaction {
            recipient,
            amount,
            sender,
        } => match blockchain.add_transaction(&recipient, sender.as_deref(), amount) {
            Ok(()) => {
                for tx in blockchain.open_transactions() {
                    println!("  {tx}");
                }
                println!("Transaction added. Run `mine` to confirm it.");
            }
            // rejected input is reported but is not a failure of the program
            Err(e) if e.is_validation() => println!("Transaction rejected: {e}"),
            Err(e) => return Err(e),
        },
        Command::Mine { miner } => match blockchain.mine_block(miner.as_deref())? {
            MineOutcome::Mined(block) => {
                println!("Mined {block}");
                println!("Hash: {}", block.hash());
            }
            MineOutcome::Throttled { retry_after } => {
                println!(
                    "Mining too fast, wait {:.1}s before the next block",
                    retry_after.as_secs_f64()
                );
            }
        },
        Command::Balance { participant } => match blockchain.get_balance_details(&participant) {
            Ok(details) => {
                println!("Balance of {}: {:.2}", details.participant, details.balance);
                println!("  received: {:.2}", details.received);
                println!("  sent:     {:.2}", details.sent);
            }
            Err(e) => {
                println!("{e}. Please check the participant name and try again.");
            }
        },
        Command::Participants => {
            println!("Participants in network:");
            for participant in blockchain.list_participants() {
                println!("  {participant}");
            }
        }
        Command::PrintChain => display_blockchain(blockchain),
        Command::VerifyChain => {
            // the integrity check in `run` reports failures
            if blockchain.chain_is_valid() {
                println!("Blockchain integrity OK.");
            }
        }
        Command::VerifyTransactions => {
            if blockchain.verify_open_transactions() {
                println!("All open transactions are valid.");
            } else {
                println!("Some open transactions are invalid!");
            }
        }
        Command::Reward => {
            println!(
                "Next block reward: {} (chain length {})",
                blockchain.get_dynamic_reward(),
                blockchain.chain().len()
            );
        }
        Command::Tamper { index } => {
            blockchain.tamper_block(index, vec![Transaction::new("Hacker", "Evil", 9999.0)])?;
            println!("Block {index} manipulated.");
        }
    }
    Ok(())
}

fn display_blockchain(blockchain: &Blockchain) {
    for block in blockchain.chain() {
        let label = if block.get_index() == 0 {
            "Genesis Block".to_string()
        } else {
            format!("Block {}", block.get_index())
        };
        println!("{label} (Hash: {}):", block.hash());
        println!("{block}");
        match serde_json::to_string_pretty(&block.to_value()) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Could not render block {}: {e}", block.get_index()),
        }
        println!();
    }
    println!("{}", "-".repeat(40));
}
