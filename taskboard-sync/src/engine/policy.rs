//! Optimistic policies and the local patches they govern

use crate::store::{AppliedDelete, AppliedMove, BoardStore};
use crate::types::{BoardState, CardId, Column};
use serde::Serialize;
use std::fmt;

/// When a local change is applied relative to its remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimisticPolicy {
    /// Local state changes only after the remote call succeeds
    None,
    /// Apply locally first; restore on failure; resync on success
    ApplyAndRollback,
    /// Apply locally first; restore on failure; keep the local value on success
    ApplyAndConfirm,
}

impl OptimisticPolicy {
    /// Whether the local change happens before the remote call
    pub fn is_optimistic(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for OptimisticPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::ApplyAndRollback => "apply-and-rollback",
            Self::ApplyAndConfirm => "apply-and-confirm",
        };
        f.write_str(name)
    }
}

/// A local change to the board
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Patch {
    Move { id: CardId, to: Column },
    Delete { id: CardId },
}

impl Patch {
    /// Apply to the store; `None` when the card is not on the board
    pub(crate) fn apply(&self, store: &mut BoardStore) -> Option<Applied> {
        match self {
            Self::Move { id, to } => {
                let (from, _) = store.state().find(id)?;
                store.apply_move(id, from.column, *to).map(Applied::Move)
            }
            Self::Delete { id } => store.apply_delete(id).map(Applied::Delete),
        }
    }
}

/// A patch that took effect
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Applied {
    Move(AppliedMove),
    Delete(AppliedDelete),
}

impl Applied {
    /// Undo just this change
    pub(crate) fn revert(&self, store: &mut BoardStore) -> bool {
        match self {
            Self::Move(applied) => store.revert_move(applied),
            Self::Delete(applied) => store.revert_delete(applied),
        }
    }
}

/// How one operation touches local state
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Plan {
    pub policy: OptimisticPolicy,
    /// Local change, applied before the call when the policy is optimistic,
    /// after a successful call otherwise
    pub patch: Option<Patch>,
    /// Re-fetch the board after a successful call
    pub resync: bool,
}

/// What an optimistic operation needs to undo itself
#[derive(Debug)]
pub(crate) struct Rollback {
    pub snapshot: BoardState,
    /// Store version right after the optimistic apply
    pub version: u64,
    pub applied: Applied,
}
