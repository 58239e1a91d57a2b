//! DeleteCard operation

use super::policy::{Patch, Plan};
use super::{Execute, OperationKind, OptimisticPolicy, Outcome, SyncEngine};
use crate::error::Result;
use crate::types::{Card, CardId};
use async_trait::async_trait;

/// Delete a card from the store, then drop it from the board.
///
/// The caller is expected to have confirmed with the user. The remote call is
/// always made, even if the card is no longer on the local board.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCard {
    pub id: CardId,
}

impl DeleteCard {
    pub fn new(id: impl Into<CardId>) -> Self {
        Self { id: id.into() }
    }

    pub fn for_card(card: &Card) -> Self {
        Self::new(&card.id)
    }
}

#[async_trait]
impl Execute for DeleteCard {
    type Output = Outcome;

    fn kind(&self) -> OperationKind {
        OperationKind::Delete
    }

    async fn execute(&self, engine: &SyncEngine) -> Result<Outcome> {
        let plan = Plan {
            policy: OptimisticPolicy::None,
            patch: Some(Patch::Delete {
                id: self.id.clone(),
            }),
            resync: false,
        };
        engine
            .mutate(self.kind(), plan, engine.remote().delete_task(&self.id))
            .await
    }
}
