//! Command-line interface
//!
//! Argument parsing for the ledger binary. Each subcommand maps onto one
//! ledger operation.

pub mod commands;

pub use commands::{Command, Opt};
