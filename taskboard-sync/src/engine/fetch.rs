//! FetchBoard operation

use super::{Execute, OperationKind, SyncEngine};
use crate::error::Result;
use crate::types::{BoardState, Partition};
use async_trait::async_trait;
use tracing::{debug, error};

/// List every task and replace the board with the partitioned result.
///
/// On failure the board is left as it was and no notification is published.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchBoard;

#[async_trait]
impl Execute for FetchBoard {
    type Output = Partition;

    fn kind(&self) -> OperationKind {
        OperationKind::Fetch
    }

    async fn execute(&self, engine: &SyncEngine) -> Result<Partition> {
        let cards = engine.remote().list_tasks().await.map_err(|e| {
            error!(operation = %self.kind(), error = %e, "failed to fetch tasks");
            e
        })?;

        let partition = BoardState::partition(cards);
        if !partition.dropped.is_empty() {
            let ids: Vec<&str> = partition.dropped.iter().map(|c| c.id.as_str()).collect();
            debug!(
                dropped = partition.dropped.len(),
                ?ids,
                "excluded records with unrecognized status"
            );
        }

        debug!(cards = partition.board.len(), "board refreshed");
        engine.replace_board(partition.board.clone()).await;
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::test_support::{card, MemoryTaskStore, RemoteOp};
    use crate::types::{Column, Status};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetch_partitions_by_status() {
        let remote = Arc::new(MemoryTaskStore::with_cards(vec![
            card("1", "a", Status::Completed),
            card("2", "b", Status::Pending),
            card("3", "c", Status::Unrecognized("archived".into())),
            card("4", "d", Status::Pending),
        ]));
        let engine = SyncEngine::new(remote);

        let partition = engine.fetch_and_partition().await.unwrap();
        assert_eq!(partition.dropped.len(), 1);

        let board = engine.board().await;
        assert_eq!(board.ids(Column::Todo), vec!["2", "4"]);
        assert!(board.cards(Column::InProgress).is_empty());
        assert_eq!(board.ids(Column::Done), vec!["1"]);
        assert_eq!(board.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_board_untouched() {
        let remote = Arc::new(MemoryTaskStore::with_cards(vec![card(
            "1",
            "a",
            Status::Doing,
        )]));
        let engine = SyncEngine::new(remote.clone());
        engine.fetch_and_partition().await.unwrap();
        let before = engine.board().await;
        let version = engine.version().await;
        let mut notifications = engine.subscribe();

        remote.set_tasks(Vec::new()).await;
        remote.fail_next(RemoteOp::List, 1).await;

        assert!(engine.fetch_and_partition().await.is_err());
        assert_eq!(engine.board().await, before);
        assert_eq!(engine.version().await, version);
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_failure_is_silent_by_default() {
        let remote = Arc::new(MemoryTaskStore::new());
        remote.fail_next(RemoteOp::List, 1).await;
        let engine = SyncEngine::new(remote);
        let mut notifications = engine.subscribe();

        assert!(engine.load().await.is_err());
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_failure_notifies_when_configured() {
        let remote = Arc::new(MemoryTaskStore::new());
        remote.fail_next(RemoteOp::List, 1).await;
        let config = BoardConfig::default().with_notify_on_load_failure(true);
        let engine = SyncEngine::with_config(remote, config);
        let mut notifications = engine.subscribe();

        assert!(engine.load().await.is_err());
        let notification = notifications.try_recv().unwrap();
        assert!(!notification.is_success());
        assert_eq!(notification.operation, OperationKind::Fetch);
        assert_eq!(FetchBoard.kind(), notification.operation);
    }
}
