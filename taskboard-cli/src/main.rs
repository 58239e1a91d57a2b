//! Taskboard CLI - a three-column task board backed by a remote task store.
//!
//! Commands:
//! - `taskboard board [--json]`: Show the board
//! - `taskboard add <title>`: Create a card
//! - `taskboard edit <id>`: Edit a card
//! - `taskboard move <id> <column>`: Move a card to todo, in-progress or done
//! - `taskboard delete <id> [--yes]`: Delete a card after confirmation
//!
//! Environment variables:
//! - TASKBOARD_BASE_URL: Task store URL
//! - TASKBOARD_TIMEOUT_SECS: Per-request timeout
//! - TASKBOARD_RESYNC_AFTER_MOVE: Re-fetch after each move
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskboard::commands::{self, CardArgs};
use taskboard::{Cli, CliError, Commands};

/// Map a command result to an exit code, printing any error.
fn handle_result(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let engine = commands::connect(cli.config.as_deref(), cli.url)?;
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Board { json } => commands::run_board(&engine, json, &mut out).await,
        Commands::Add {
            title,
            description,
            status,
            priority,
        } => {
            let args = CardArgs {
                description,
                status,
                priority,
                ..Default::default()
            };
            commands::run_add(&engine, title, args, &mut out).await
        }
        Commands::Edit {
            id,
            title,
            description,
            status,
            priority,
            clear_priority,
        } => {
            let args = CardArgs {
                title,
                description,
                status,
                priority,
                clear_priority,
            };
            commands::run_edit(&engine, &id, args, &mut out).await
        }
        Commands::Move { id, column } => commands::run_move(&engine, &id, &column, &mut out).await,
        Commands::Delete { id, yes } => commands::run_delete(&engine, &id, yes, &mut out).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("taskboard=debug,taskboard_sync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = handle_result(run(cli).await);
    std::process::exit(exit_code);
}
