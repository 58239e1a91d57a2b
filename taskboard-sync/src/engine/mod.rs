//! SyncEngine - keeps the local board consistent with the remote task store
//!
//! Every mutating operation follows the same sequence, driven by its
//! [`OptimisticPolicy`]:
//!
//! 1. optionally patch the board before the remote call (moves only),
//! 2. make the remote call,
//! 3. on success: apply a confirmed patch, notify, then re-fetch if planned,
//! 4. on failure: restore the pre-mutation state if anything was applied.
//!
//! Each completed operation publishes exactly one [`Notification`].
//! Operations never hold the board lock across a remote call, so
//! concurrent operations interleave only while waiting on the store.

mod delete_card;
mod fetch;
mod move_card;
mod notification;
mod operation;
mod policy;
mod save_card;

pub use delete_card::DeleteCard;
pub use fetch::FetchBoard;
pub use move_card::MoveCard;
pub use notification::{Notification, OperationKind, Severity};
pub use operation::{Execute, Outcome};
pub use policy::OptimisticPolicy;
pub use save_card::SaveCard;

use crate::config::BoardConfig;
use crate::error::Result;
use crate::remote::{RemoteResult, TaskStore};
use crate::store::BoardStore;
use crate::types::{BoardState, Card, CardForm, CardId, Column, Partition};
use policy::{Plan, Rollback};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, trace, warn};

/// Orchestrates fetches and mutations against the remote store
pub struct SyncEngine {
    remote: Arc<dyn TaskStore>,
    board: RwLock<BoardStore>,
    config: BoardConfig,
    notifications: broadcast::Sender<Notification>,
}

impl SyncEngine {
    /// Create an engine with default configuration
    pub fn new(remote: Arc<dyn TaskStore>) -> Self {
        Self::with_config(remote, BoardConfig::default())
    }

    /// Create an engine with explicit configuration
    pub fn with_config(remote: Arc<dyn TaskStore>, config: BoardConfig) -> Self {
        let (notifications, _) = broadcast::channel(config.notification_capacity.max(1));
        Self {
            remote,
            board: RwLock::new(BoardStore::new()),
            config,
            notifications,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The remote store this engine talks to
    pub fn remote(&self) -> &dyn TaskStore {
        self.remote.as_ref()
    }

    /// Subscribe to operation notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Snapshot of the current board
    pub async fn board(&self) -> BoardState {
        self.board.read().await.snapshot()
    }

    /// Version of the current board
    pub async fn version(&self) -> u64 {
        self.board.read().await.version()
    }

    /// Look up a card on the current board
    pub async fn find_card(&self, id: &CardId) -> Option<Card> {
        self.board
            .read()
            .await
            .state()
            .find(id)
            .map(|(_, card)| card.clone())
    }

    /// Initial load.
    ///
    /// Same as [`SyncEngine::fetch_and_partition`], but publishes a failure
    /// notification when `notify_on_load_failure` is configured.
    pub async fn load(&self) -> Result<Partition> {
        let result = self.fetch_and_partition().await;
        if result.is_err() && self.config.notify_on_load_failure {
            self.notify(Notification::failure(FetchBoard.kind()));
        }
        result
    }

    /// List all tasks and rebuild the board from them
    pub async fn fetch_and_partition(&self) -> Result<Partition> {
        FetchBoard.execute(self).await
    }

    /// Discard the local board and rebuild it from the remote store
    pub async fn invalidate_and_refetch(&self) -> Result<Partition> {
        debug!("invalidating local board");
        self.fetch_and_partition().await
    }

    /// Move a card to another column
    pub async fn move_card(&self, id: impl Into<CardId>, column: Column) -> Result<Outcome> {
        MoveCard::new(id, column).execute(self).await
    }

    /// Create a card, or edit `editing` when given
    pub async fn save_card(&self, form: CardForm, editing: Option<&Card>) -> Result<Outcome<Card>> {
        let op = match editing {
            Some(card) => SaveCard::edit(form, card.clone()),
            None => SaveCard::create(form),
        };
        op.execute(self).await
    }

    /// Delete a card. Confirmation is the caller's responsibility.
    pub async fn delete_card(&self, card: &Card) -> Result<Outcome> {
        DeleteCard::for_card(card).execute(self).await
    }

    pub(crate) async fn replace_board(&self, state: BoardState) {
        self.board.write().await.replace(state);
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            trace!("no notification subscribers");
        }
    }

    /// Run one mutating operation according to its plan
    pub(crate) async fn mutate<T, F>(
        &self,
        kind: OperationKind,
        plan: Plan,
        remote: F,
    ) -> Result<Outcome<T>>
    where
        T: Send,
        F: Future<Output = RemoteResult<T>> + Send,
    {
        let rollback = match (&plan.patch, plan.policy.is_optimistic()) {
            (Some(patch), true) => {
                let mut board = self.board.write().await;
                let snapshot = board.snapshot();
                match patch.apply(&mut board) {
                    Some(applied) => Some(Rollback {
                        snapshot,
                        version: board.version(),
                        applied,
                    }),
                    None => {
                        debug!(operation = %kind, "card not on board, skipping");
                        return Ok(Outcome::Skipped);
                    }
                }
            }
            _ => None,
        };

        match remote.await {
            Ok(value) => {
                if !plan.policy.is_optimistic() {
                    if let Some(patch) = &plan.patch {
                        let mut board = self.board.write().await;
                        if patch.apply(&mut board).is_none() {
                            debug!(operation = %kind, "confirmed change had no local counterpart");
                        }
                    }
                }

                info!(operation = %kind, policy = %plan.policy, "operation succeeded");
                self.notify(Notification::success(kind));

                if plan.resync {
                    if let Err(error) = self.invalidate_and_refetch().await {
                        warn!(operation = %kind, %error, "resync after write failed, keeping local board");
                    }
                }
                Ok(Outcome::Applied(value))
            }
            Err(error) => {
                error!(operation = %kind, %error, "remote call failed");
                if let Some(rollback) = rollback {
                    self.roll_back(kind, rollback).await;
                }
                self.notify(Notification::failure(kind));
                Err(error.into())
            }
        }
    }

    /// Restore the state captured before an optimistic change.
    ///
    /// If the board changed since the change was applied, the snapshot is
    /// stale; only this operation's own change is reverted.
    async fn roll_back(&self, kind: OperationKind, rollback: Rollback) {
        let mut board = self.board.write().await;
        if board.version() == rollback.version {
            board.replace(rollback.snapshot);
            debug!(operation = %kind, "restored pre-mutation board");
            return;
        }

        warn!(
            operation = %kind,
            expected = rollback.version,
            found = board.version(),
            "board changed during remote call, reverting only this change"
        );
        if !rollback.applied.revert(&mut board) {
            warn!(operation = %kind, "card no longer where the change left it, nothing reverted");
        }
    }
}
