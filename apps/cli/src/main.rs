//! NeuralStack CLI: runs one pass of the autonomous content pipeline.
//!
//! Discovers topics, generates long-form articles, validates them, and
//! publishes approved posts to the site directory. Every pass is recorded in
//! the performance ledger, including failed ones.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _cli = Cli::parse();
    commands::run()
}
