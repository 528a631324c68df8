//! Questctl - CLI client for the Questlog engine
//!
//! Presentation glue only: parses arguments, opens the engine, calls its
//! public operations and prints the results. All invariants live in
//! `quest_core`.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut engine = quest_core::Engine::open(&commands::data_dir(&cli))?;
    let user = cli.user.clone();

    match cli.command {
        Commands::Status { json } => commands::status(&engine, &user, json),
        Commands::Activity { action } => commands::activity(&mut engine, &user, action),
        Commands::Todo { action } => commands::todo(&mut engine, &user, action),
        Commands::Journal { action } => commands::journal(&mut engine, &user, action),
        Commands::Reward { action } => commands::reward(&mut engine, &user, action),
        Commands::Seed => commands::seed(&mut engine, &user),
    }
}
