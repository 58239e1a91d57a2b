//! CLI definition for the taskboard command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Taskboard - a three-column task board backed by a remote task store.
///
/// Cards live in To Do, In Progress and Done. Every command loads the board
/// from the store first; moves are applied optimistically and rolled back if
/// the store rejects them.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Three-column task board backed by a remote task store")]
#[command(
    long_about = "Taskboard shows and edits a three-column board (To Do, In Progress, Done) \
    whose cards live in a remote task store.\n\n\
    Settings are read from ./taskboard.toml and TASKBOARD_* environment variables.\n\n\
    Environment variables:\n  \
    TASKBOARD_BASE_URL           Task store URL (default http://localhost:3000)\n  \
    TASKBOARD_TIMEOUT_SECS       Per-request timeout\n  \
    TASKBOARD_RESYNC_AFTER_MOVE  Re-fetch the board after each move (default true)"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Task store URL, overrides configuration
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Configuration file to use instead of ./taskboard.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the board
    Board {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a card
    Add {
        /// Card title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// pending, doing or completed
        #[arg(long)]
        status: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
    },

    /// Edit a card; fields not given are kept
    Edit {
        /// Card id
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// pending, doing or completed
        #[arg(long)]
        status: Option<String>,
        /// low, medium or high
        #[arg(long, conflicts_with = "clear_priority")]
        priority: Option<String>,
        /// Remove the card's priority
        #[arg(long)]
        clear_priority: bool,
    },

    /// Move a card to another column
    Move {
        /// Card id
        id: String,
        /// todo, in-progress or done
        column: String,
    },

    /// Delete a card
    Delete {
        /// Card id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
