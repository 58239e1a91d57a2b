//! Board state synchronization for a three-column task board
//!
//! This crate keeps a local, column-partitioned view of task records
//! consistent with a remote CRUD task store. Moves are applied optimistically
//! and rolled back on failure; creates, edits and deletes wait for the store.
//!
//! ## Overview
//!
//! - **Three fixed columns** - To Do, In Progress and Done map one-to-one onto
//!   the `pending`, `doing` and `completed` statuses
//! - **Single owner** - the board lives in one [`store::BoardStore`], only
//!   mutated through the [`SyncEngine`]
//! - **Optimistic moves** - the card moves at once; a failed remote call
//!   restores the board as it was
//! - **One notification per operation** - subscribers get exactly one
//!   success or failure [`engine::Notification`] for every mutation
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_sync::{remote::HttpTaskStore, types::Column, BoardConfig, SyncEngine};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoardConfig::load()?;
//! let remote = Arc::new(HttpTaskStore::from_config(&config)?);
//! let engine = SyncEngine::with_config(remote, config);
//!
//! engine.load().await?;
//! engine.move_card("3", Column::Done).await?;
//!
//! for card in engine.board().await.cards(Column::Done) {
//!     println!("{} {}", card.id, card.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
mod error;
pub mod remote;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::BoardConfig;
pub use engine::{Execute, Notification, OperationKind, OptimisticPolicy, Outcome, SyncEngine};
pub use error::{BoardError, Result};
