//! MoveCard operation

use super::policy::{Patch, Plan};
use super::{Execute, OperationKind, OptimisticPolicy, Outcome, SyncEngine};
use crate::config::BoardConfig;
use crate::error::Result;
use crate::types::{CardId, Column, TaskPatch};
use async_trait::async_trait;

/// Move a card to the end of another column, changing its status.
///
/// Applied optimistically. On failure the board is restored; on success it is
/// re-fetched, or the optimistic placement is kept when
/// `resync_after_move` is off. A card that is not on the board is skipped
/// without a remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCard {
    /// The card to move
    pub id: CardId,
    /// Destination column
    pub column: Column,
}

impl MoveCard {
    pub fn new(id: impl Into<CardId>, column: Column) -> Self {
        Self {
            id: id.into(),
            column,
        }
    }

    /// Rollback when the store re-fetches afterwards, confirm otherwise
    pub fn policy(&self, config: &BoardConfig) -> OptimisticPolicy {
        if config.resync_after_move {
            OptimisticPolicy::ApplyAndRollback
        } else {
            OptimisticPolicy::ApplyAndConfirm
        }
    }
}

#[async_trait]
impl Execute for MoveCard {
    type Output = Outcome;

    fn kind(&self) -> OperationKind {
        OperationKind::Move
    }

    async fn execute(&self, engine: &SyncEngine) -> Result<Outcome> {
        let policy = self.policy(engine.config());
        let plan = Plan {
            policy,
            patch: Some(Patch::Move {
                id: self.id.clone(),
                to: self.column,
            }),
            resync: policy == OptimisticPolicy::ApplyAndRollback,
        };

        // Only the status changes on a move, so only id and status are sent
        let patch = TaskPatch::status(self.id.clone(), self.column.status());
        engine
            .mutate(
                self.kind(),
                plan,
                engine.remote().update_task(&self.id, &patch),
            )
            .await
    }
}
