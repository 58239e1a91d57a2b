//! Engine behaviour across operations, against the in-memory store

use std::sync::Arc;

use taskboard_sync::test_support::{card, MemoryTaskStore, RemoteOp};
use taskboard_sync::types::{
    column_to_status, status_to_column, BoardState, CardForm, CardId, Column, Status,
};
use taskboard_sync::{BoardConfig, Notification, OperationKind, Outcome, SyncEngine};
use tokio::sync::broadcast::Receiver;

fn listing() -> Vec<taskboard_sync::types::Card> {
    vec![
        card("1", "plan", Status::Pending),
        card("2", "build", Status::Doing),
        card("3", "test", Status::Pending),
        card("4", "ship", Status::Completed),
        card("5", "someday", Status::Unrecognized("backlog".into())),
    ]
}

async fn loaded() -> (Arc<MemoryTaskStore>, SyncEngine) {
    let remote = Arc::new(MemoryTaskStore::with_cards(listing()));
    let engine = SyncEngine::new(remote.clone());
    engine.load().await.unwrap();
    remote.clear_calls().await;
    (remote, engine)
}

fn drain(rx: &mut Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

#[test]
fn test_column_status_bijection() {
    for column in Column::ALL {
        assert_eq!(status_to_column(&column_to_status(column)), Some(column));
    }
    for status in [Status::Pending, Status::Doing, Status::Completed] {
        let column = status_to_column(&status).unwrap();
        assert_eq!(column_to_status(column), status);
    }
    assert_eq!(status_to_column(&Status::Unrecognized("blocked".into())), None);
}

#[test]
fn test_partition_places_every_known_card_once() {
    let partition = BoardState::partition(listing());
    let board = partition.board;

    assert_eq!(board.ids(Column::Todo), vec!["1", "3"]);
    assert_eq!(board.ids(Column::InProgress), vec!["2"]);
    assert_eq!(board.ids(Column::Done), vec!["4"]);
    assert!(board.ids_are_unique());
    assert_eq!(partition.dropped.len(), 1);
    assert_eq!(partition.dropped[0].id.as_str(), "5");

    for (column, cards) in board.iter() {
        assert!(cards.iter().all(|c| c.status == column.status()));
    }
}

#[tokio::test]
async fn test_failed_move_restores_identical_board() {
    let (remote, engine) = loaded().await;
    let before = engine.board().await;
    remote.fail_next(RemoteOp::Update, 1).await;

    assert!(engine.move_card("1", Column::Done).await.is_err());
    assert_eq!(engine.board().await, before);
}

#[tokio::test]
async fn test_successful_move_matches_store_after_resync() {
    let (remote, engine) = loaded().await;

    engine.move_card("3", Column::InProgress).await.unwrap();

    let expected = BoardState::partition(remote.tasks().await).board;
    assert_eq!(engine.board().await, expected);
    assert_eq!(engine.board().await.ids(Column::InProgress), vec!["2", "3"]);
}

#[tokio::test]
async fn test_each_mutation_publishes_one_notification() {
    let (remote, engine) = loaded().await;
    let mut rx = engine.subscribe();

    engine.move_card("1", Column::Done).await.unwrap();
    assert_eq!(drain(&mut rx).len(), 1);

    remote.fail_next(RemoteOp::Update, 1).await;
    let _ = engine.move_card("2", Column::Todo).await;
    let failures = drain(&mut rx);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].to_string(), "Error: Failed to move the card.");

    engine.save_card(CardForm::new("new"), None).await.unwrap();
    assert_eq!(drain(&mut rx).len(), 1);

    let target = engine.find_card(&CardId::from("4")).await.unwrap();
    engine.delete_card(&target).await.unwrap();
    let deleted = drain(&mut rx);
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].operation, OperationKind::Delete);

    assert_eq!(engine.move_card("404", Column::Todo).await.unwrap(), Outcome::Skipped);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_refetch_picks_up_external_changes() {
    let (remote, engine) = loaded().await;
    remote
        .set_tasks(vec![
            card("1", "plan", Status::Completed),
            card("7", "from elsewhere", Status::Pending),
        ])
        .await;

    engine.invalidate_and_refetch().await.unwrap();

    let board = engine.board().await;
    assert_eq!(board.ids(Column::Todo), vec!["7"]);
    assert_eq!(board.ids(Column::Done), vec!["1"]);
    assert_eq!(board.len(), 2);
}

#[tokio::test]
async fn test_resync_failure_keeps_optimistic_board() {
    let (remote, engine) = loaded().await;
    remote.fail_next(RemoteOp::List, 1).await;
    let mut rx = engine.subscribe();

    let outcome = engine.move_card("1", Column::Done).await.unwrap();
    assert!(outcome.is_applied());
    assert_eq!(engine.board().await.ids(Column::Done), vec!["4", "1"]);

    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_success());
}

#[tokio::test]
async fn test_stale_rollback_reverts_only_its_own_move() {
    let remote = Arc::new(MemoryTaskStore::with_cards(listing()));
    let config = BoardConfig::default().with_resync_after_move(false);
    let engine = SyncEngine::with_config(remote.clone(), config);
    engine.load().await.unwrap();
    let gate = remote.hold(RemoteOp::Update).await;

    // The first move is held; a second move completes while it is in
    // flight, then the first one fails.
    let (first, second) = tokio::join!(engine.move_card("1", Column::Done), async {
        gate.entered().await;
        let result = engine.move_card("2", Column::Done).await;
        remote.fail_next(RemoteOp::Update, 1).await;
        gate.release();
        result
    });

    assert!(first.is_err());
    assert!(second.unwrap().is_applied());

    let board = engine.board().await;
    assert_eq!(board.ids(Column::Todo), vec!["1", "3"]);
    assert!(board.cards(Column::InProgress).is_empty());
    assert_eq!(board.ids(Column::Done), vec!["4", "2"]);
    let (_, restored) = board.find(&CardId::from("1")).unwrap();
    assert_eq!(restored.status, Status::Pending);
    assert!(board.ids_are_unique());
}
