//! pubsync CLI
//!
//! Command-line front end for the article service

use clap::{Parser, Subcommand};
use pubsync_core::errors::ExError;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "pubsync")]
#[command(about = "pubsync - Draft and published article stores kept in step", long_about = None)]
struct Cli {
    /// Deployment configuration (TOML)
    #[arg(long, global = true, default_value = "pubsync.toml")]
    config: PathBuf,

    /// Abort the request after this many milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Correlation id supplied by the caller, carried into every log line
    #[arg(long, global = true)]
    trace_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Save an item as an unpublished draft
    Save(commands::write::SaveArgs),
    /// Publish an item to the published store
    Publish(commands::write::SaveArgs),
    /// Withdraw a published item (make it private)
    Withdraw(commands::write::WithdrawArgs),
    /// Read an item from the draft store
    Get(commands::read::GetArgs),
    /// Read an item from the published store
    GetPublished(commands::read::GetArgs),
    /// List an author's drafts, newest first
    List(commands::read::ListArgs),
}

fn run(cli: Cli) -> Result<(), ExError> {
    let env = commands::Env::open(&cli.config, cli.timeout_ms, cli.trace_id)?;

    match cli.command {
        Commands::Save(args) => commands::write::save(&env, args),
        Commands::Publish(args) => commands::write::publish(&env, args),
        Commands::Withdraw(args) => commands::write::withdraw(&env, args),
        Commands::Get(args) => commands::read::get(&env, args),
        Commands::GetPublished(args) => commands::read::get_published(&env, args),
        Commands::List(args) => commands::read::list(&env, args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(id) = e.committed_id() {
            eprintln!("Draft committed as id {}; published store not updated", id);
            std::process::exit(2);
        }
        std::process::exit(1);
    }
}
