//! SaveCard operation

use super::policy::Plan;
use super::{Execute, OperationKind, OptimisticPolicy, Outcome, SyncEngine};
use crate::error::Result;
use crate::types::{Card, CardForm, TaskPatch};
use async_trait::async_trait;
use chrono::Utc;

/// Create a new card, or edit an existing one, from submitted form values.
///
/// Nothing changes locally until the store confirms; the board is then
/// re-fetched so server-assigned ids and normalised fields show up.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveCard {
    pub form: CardForm,
    /// The card being edited; `None` creates a new one
    pub editing: Option<Card>,
}

impl SaveCard {
    pub fn create(form: CardForm) -> Self {
        Self {
            form,
            editing: None,
        }
    }

    pub fn edit(form: CardForm, card: Card) -> Self {
        Self {
            form,
            editing: Some(card),
        }
    }
}

#[async_trait]
impl Execute for SaveCard {
    /// The card as sent (edit) or as returned by the store (create)
    type Output = Outcome<Card>;

    fn kind(&self) -> OperationKind {
        if self.editing.is_some() {
            OperationKind::Update
        } else {
            OperationKind::Create
        }
    }

    async fn execute(&self, engine: &SyncEngine) -> Result<Outcome<Card>> {
        let plan = Plan {
            policy: OptimisticPolicy::None,
            patch: None,
            resync: true,
        };

        match &self.editing {
            Some(existing) => {
                let merged = self.form.merge_into(existing);
                let patch = TaskPatch::full(merged.clone());
                let outcome = engine
                    .mutate(
                        self.kind(),
                        plan,
                        engine.remote().update_task(&existing.id, &patch),
                    )
                    .await?;
                Ok(outcome.map(|()| merged))
            }
            None => {
                let new = self.form.to_new_card(Utc::now());
                engine
                    .mutate(self.kind(), plan, engine.remote().create_task(&new))
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{card, MemoryTaskStore, RecordedCall, RemoteOp};
    use crate::types::{CardId, Column, Priority, Status};
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryTaskStore>, SyncEngine) {
        let remote = Arc::new(MemoryTaskStore::with_cards(vec![
            card("1", "write docs", Status::Pending),
            card("2", "ship", Status::Doing),
        ]));
        let engine = SyncEngine::new(remote.clone());
        engine.fetch_and_partition().await.unwrap();
        remote.clear_calls().await;
        (remote, engine)
    }

    #[test]
    fn test_kind_follows_editing() {
        let form = CardForm::new("x");
        assert_eq!(SaveCard::create(form.clone()).kind(), OperationKind::Create);
        assert_eq!(
            SaveCard::edit(form, card("1", "x", Status::Pending)).kind(),
            OperationKind::Update
        );
    }

    #[tokio::test]
    async fn test_create_places_server_card_after_resync() {
        let (remote, engine) = setup().await;
        let mut notifications = engine.subscribe();

        let form = CardForm::new("review")
            .with_description("check the PR")
            .with_priority(Some(Priority::High));
        let created = engine
            .save_card(form, None)
            .await
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(created.id.as_str(), "3");
        assert_eq!(created.status, Status::Pending);
        assert_eq!(
            remote
                .calls()
                .await
                .iter()
                .map(RecordedCall::op)
                .collect::<Vec<_>>(),
            vec![RemoteOp::Create, RemoteOp::List]
        );

        let board = engine.board().await;
        assert_eq!(board.ids(Column::Todo), vec!["1", "3"]);
        let (_, placed) = board.find(&CardId::from("3")).unwrap();
        assert_eq!(placed.priority, Some(Priority::High));

        let notification = notifications.try_recv().unwrap();
        assert_eq!(notification.message, "Card created successfully!");
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_is_not_optimistic() {
        let (remote, engine) = setup().await;
        let gate = remote.hold(RemoteOp::Create).await;

        let (result, ()) = tokio::join!(engine.save_card(CardForm::new("later"), None), async {
            gate.entered().await;
            assert_eq!(engine.board().await.len(), 2);
            gate.release();
        });

        assert!(result.unwrap().is_applied());
        assert_eq!(engine.board().await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_failure_leaves_board() {
        let (remote, engine) = setup().await;
        let before = engine.board().await;
        let mut notifications = engine.subscribe();
        remote.fail_next(RemoteOp::Create, 1).await;

        assert!(engine.save_card(CardForm::new("nope"), None).await.is_err());
        assert_eq!(engine.board().await, before);
        assert_eq!(remote.count(RemoteOp::List).await, 0);
        assert_eq!(
            notifications.try_recv().unwrap().message,
            "Failed to create the card."
        );
    }

    #[tokio::test]
    async fn test_edit_sends_full_record_and_keeps_identity() {
        let (remote, engine) = setup().await;
        let existing = engine.find_card(&CardId::from("2")).await.unwrap();

        let form = CardForm::from_card(&existing)
            .with_status(Status::Completed)
            .with_description("released");
        let saved = engine
            .save_card(form, Some(&existing))
            .await
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(saved.id, existing.id);
        assert_eq!(saved.created_at, existing.created_at);
        assert_eq!(
            remote.calls().await.first(),
            Some(&RecordedCall::Update(
                existing.id.clone(),
                TaskPatch::full(saved.clone())
            ))
        );

        let board = engine.board().await;
        assert!(board.cards(Column::InProgress).is_empty());
        assert_eq!(board.ids(Column::Done), vec!["2"]);
    }

    #[tokio::test]
    async fn test_edit_failure_leaves_board() {
        let (remote, engine) = setup().await;
        let before = engine.board().await;
        let existing = engine.find_card(&CardId::from("1")).await.unwrap();
        remote.fail_next(RemoteOp::Update, 1).await;

        let form = CardForm::from_card(&existing).with_status(Status::Doing);
        assert!(engine.save_card(form, Some(&existing)).await.is_err());
        assert_eq!(engine.board().await, before);
    }
}
