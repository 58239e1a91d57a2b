//! In-memory task store and fixtures for tests
//!
//! Available to this crate's own tests and, through the `test-support`
//! feature, to integration tests and downstream crates.

use crate::remote::{RemoteError, RemoteResult, TaskStore};
use crate::types::{Card, CardId, NewCard, Status, TaskPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify, Semaphore};

/// The four remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    List,
    Create,
    Update,
    Delete,
}

/// A call received by [`MemoryTaskStore`], with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    List,
    Create(NewCard),
    Update(CardId, TaskPatch),
    Delete(CardId),
}

impl RecordedCall {
    pub fn op(&self) -> RemoteOp {
        match self {
            Self::List => RemoteOp::List,
            Self::Create(_) => RemoteOp::Create,
            Self::Update(..) => RemoteOp::Update,
            Self::Delete(_) => RemoteOp::Delete,
        }
    }
}

/// Suspends one remote call until released.
///
/// `entered` resolves once the held call has started waiting, so a test can
/// interleave another operation while the first is in flight.
#[derive(Debug)]
pub struct Gate {
    entered: Notify,
    release: Semaphore,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }
}

impl Gate {
    /// Wait until the held call is suspended on this gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the held call continue
    pub fn release(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) -> RemoteResult<()> {
        self.entered.notify_one();
        self.release
            .acquire()
            .await
            .map(|permit| permit.forget())
            .map_err(|_| RemoteError::Unavailable("gate closed".into()))
    }
}

/// A task store that keeps records in memory.
///
/// Ids are assigned sequentially starting at `1`. Failures can be injected
/// per call kind, and single calls can be held on a [`Gate`].
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Card>>,
    next_id: AtomicU64,
    fail_next: Mutex<HashMap<RemoteOp, usize>>,
    fail_always: Mutex<Vec<RemoteOp>>,
    gates: Mutex<HashMap<RemoteOp, Arc<Gate>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records; new ids continue after the count
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            next_id: AtomicU64::new(cards.len() as u64),
            tasks: Mutex::new(cards),
            ..Self::default()
        }
    }

    /// Replace the server-side records, as another client would
    pub async fn set_tasks(&self, cards: Vec<Card>) {
        *self.tasks.lock().await = cards;
    }

    /// Current server-side records
    pub async fn tasks(&self) -> Vec<Card> {
        self.tasks.lock().await.clone()
    }

    /// Fail the next `times` calls of `op`
    pub async fn fail_next(&self, op: RemoteOp, times: usize) {
        *self.fail_next.lock().await.entry(op).or_default() += times;
    }

    /// Fail every call of `op` until [`MemoryTaskStore::recover`]
    pub async fn fail_always(&self, op: RemoteOp) {
        self.fail_always.lock().await.push(op);
    }

    /// Clear all injected failures
    pub async fn recover(&self) {
        self.fail_next.lock().await.clear();
        self.fail_always.lock().await.clear();
    }

    /// Hold the next call of `op` until the returned gate is released
    pub async fn hold(&self, op: RemoteOp) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates.lock().await.insert(op, gate.clone());
        gate
    }

    /// Every call received so far, oldest first
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls of one kind received so far
    pub async fn count(&self, op: RemoteOp) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.op() == op)
            .count()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    /// Record the call, wait on a gate if one is set, then decide failure
    async fn enter(&self, call: RecordedCall) -> RemoteResult<()> {
        let op = call.op();
        self.calls.lock().await.push(call);

        let gate = self.gates.lock().await.remove(&op);
        if let Some(gate) = gate {
            gate.pass().await?;
        }

        if self.fail_always.lock().await.contains(&op) {
            return Err(RemoteError::Unavailable(format!("{:?} rejected", op)));
        }

        let mut fail_next = self.fail_next.lock().await;
        if let Some(remaining) = fail_next.get_mut(&op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(RemoteError::Unavailable(format!("{:?} rejected", op)));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks(&self) -> RemoteResult<Vec<Card>> {
        self.enter(RecordedCall::List).await?;
        Ok(self.tasks.lock().await.clone())
    }

    async fn create_task(&self, card: &NewCard) -> RemoteResult<Card> {
        self.enter(RecordedCall::Create(card.clone())).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Card::from_new(id.to_string(), card.clone());
        self.tasks.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: &CardId, patch: &TaskPatch) -> RemoteResult<()> {
        self.enter(RecordedCall::Update(id.clone(), patch.clone()))
            .await?;
        let mut tasks = self.tasks.lock().await;
        let card = tasks
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| RemoteError::status(404, "Not Found"))?;
        patch.apply_to(card);
        Ok(())
    }

    async fn delete_task(&self, id: &CardId) -> RemoteResult<()> {
        self.enter(RecordedCall::Delete(id.clone())).await?;
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|c| &c.id != id);
        if tasks.len() == before {
            return Err(RemoteError::status(404, "Not Found"));
        }
        Ok(())
    }
}

/// A card fixture with a fixed creation time
pub fn card(id: &str, title: &str, status: Status) -> Card {
    Card {
        id: CardId::from(id),
        title: title.to_string(),
        description: String::new(),
        status,
        priority: None,
        created_at: Some(
            "2024-05-01T10:00:00Z"
                .parse()
                .expect("fixture timestamp is valid"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryTaskStore::with_cards(vec![card("1", "a", Status::Pending)]);
        let new = crate::types::CardForm::new("b").to_new_card(chrono::Utc::now());

        let created = store.create_task(&new).await.unwrap();
        assert_eq!(created.id.as_str(), "2");
        assert_eq!(store.tasks().await.len(), 2);
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed() {
        let store = MemoryTaskStore::new();
        store.fail_next(RemoteOp::List, 1).await;

        assert!(store.list_tasks().await.is_err());
        assert!(store.list_tasks().await.is_ok());
        assert_eq!(store.count(RemoteOp::List).await, 2);
    }

    #[tokio::test]
    async fn test_gate_holds_call() {
        let store = MemoryTaskStore::with_cards(vec![card("1", "a", Status::Pending)]);
        let gate = store.hold(RemoteOp::Delete).await;

        let target = CardId::from("1");
        let (result, ()) = tokio::join!(store.delete_task(&target), async {
            gate.entered().await;
            assert_eq!(store.tasks().await.len(), 1);
            gate.release();
        });

        assert!(result.is_ok());
        assert!(store.tasks().await.is_empty());
    }
}
