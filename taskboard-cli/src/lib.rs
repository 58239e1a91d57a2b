//! Taskboard CLI library.
//!
//! Exposes the command-line definition and command implementations so they
//! can be exercised from tests without spawning the binary.

pub mod cli;
pub mod commands;
mod error;
pub mod table;

pub use cli::{Cli, Commands};
pub use error::CliError;
