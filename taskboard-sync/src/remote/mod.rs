//! Remote task store: the CRUD contract the engine talks to
//!
//! The engine only sees the [`TaskStore`] trait. [`HttpTaskStore`] speaks
//! JSON over HTTP to a `/tasks` resource.

mod client;
mod error;

pub use client::{HttpTaskStore, DEFAULT_BASE_URL};
pub use error::RemoteError;

use crate::types::{Card, CardId, NewCard, TaskPatch};
use async_trait::async_trait;

/// Result type for remote calls
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Authoritative store of task records.
///
/// Every call may fail; the engine does not distinguish failure kinds.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All known cards, in no particular column order
    async fn list_tasks(&self) -> RemoteResult<Vec<Card>>;

    /// Create a card; the store assigns the id
    async fn create_task(&self, card: &NewCard) -> RemoteResult<Card>;

    /// Update a card with a partial (`{id, status}`) or full record
    async fn update_task(&self, id: &CardId, patch: &TaskPatch) -> RemoteResult<()>;

    /// Delete a card
    async fn delete_task(&self, id: &CardId) -> RemoteResult<()>;
}
