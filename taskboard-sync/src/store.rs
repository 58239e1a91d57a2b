//! BoardStore - the single in-memory owner of the board state
//!
//! All operations are synchronous. The engine serialises access, so no
//! locking happens here. Every change to the content bumps a monotonically
//! increasing version, which lets a suspended operation detect that someone
//! else mutated the board while it was waiting on the remote store.

use crate::types::{BoardState, Card, CardId, Column, Placement, Status};
use tracing::trace;

/// Owns the current [`BoardState`]
#[derive(Debug, Default)]
pub struct BoardStore {
    state: BoardState,
    version: u64,
}

/// Record of a move that was applied, enough to undo just that move
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    pub id: CardId,
    pub from: Placement,
    pub to: Column,
    pub previous_status: Status,
}

/// Record of a delete that was applied
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDelete {
    pub card: Card,
    pub from: Placement,
}

impl BoardStore {
    /// A store holding three empty columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the current state
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> BoardState {
        self.state.clone()
    }

    /// Version of the current state; changes whenever the content changes
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version += 1;
        trace!(version = self.version, "board state changed");
    }

    /// Atomically replace the whole board
    pub fn replace(&mut self, state: BoardState) {
        self.state = state;
        self.bump();
    }

    /// Move a card from `from` to the end of `to`, setting its status to
    /// match `to`. Returns `None` without touching anything if the card is
    /// not in `from`.
    pub fn apply_move(&mut self, id: &CardId, from: Column, to: Column) -> Option<AppliedMove> {
        let index = self.state.cards(from).iter().position(|c| &c.id == id)?;
        let mut card = self.state.cards_mut(from).remove(index);
        let previous_status = std::mem::replace(&mut card.status, to.status());
        self.state.cards_mut(to).push(card);
        self.bump();

        Some(AppliedMove {
            id: id.clone(),
            from: Placement {
                column: from,
                index,
            },
            to,
            previous_status,
        })
    }

    /// Remove a card from whichever column holds it
    pub fn apply_delete(&mut self, id: &CardId) -> Option<AppliedDelete> {
        let (from, _) = self.state.find(id)?;
        let card = self.state.cards_mut(from.column).remove(from.index);
        self.bump();
        Some(AppliedDelete { card, from })
    }

    /// Undo a single move, leaving every other card where it is now.
    ///
    /// The card must still be in the column the move put it in. Returns
    /// whether anything was reverted.
    pub fn revert_move(&mut self, applied: &AppliedMove) -> bool {
        let Some(index) = self
            .state
            .cards(applied.to)
            .iter()
            .position(|c| c.id == applied.id)
        else {
            return false;
        };

        let mut card = self.state.cards_mut(applied.to).remove(index);
        card.status = applied.previous_status.clone();
        let target = self.state.cards_mut(applied.from.column);
        let at = applied.from.index.min(target.len());
        target.insert(at, card);
        self.bump();
        true
    }

    /// Undo a single delete if the card has not reappeared in the meantime
    pub fn revert_delete(&mut self, applied: &AppliedDelete) -> bool {
        if self.state.contains(&applied.card.id) {
            return false;
        }

        let target = self.state.cards_mut(applied.from.column);
        let at = applied.from.index.min(target.len());
        target.insert(at, applied.card.clone());
        self.bump();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, status: Status) -> Card {
        Card {
            id: CardId::from(id),
            title: format!("card {}", id),
            description: String::new(),
            status,
            priority: None,
            created_at: Some("2024-05-01T10:00:00Z".parse().unwrap()),
        }
    }

    fn seeded() -> BoardStore {
        let mut store = BoardStore::new();
        store.replace(
            BoardState::partition(vec![
                card("a", Status::Pending),
                card("b", Status::Pending),
                card("c", Status::Doing),
            ])
            .board,
        );
        store
    }

    #[test]
    fn test_replace_bumps_version() {
        let mut store = BoardStore::new();
        assert_eq!(store.version(), 0);
        store.replace(BoardState::new());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_apply_move_appends_and_sets_status() {
        let mut store = seeded();
        let before = store.version();

        let applied = store
            .apply_move(&CardId::from("a"), Column::Todo, Column::InProgress)
            .unwrap();

        assert_eq!(store.state().ids(Column::Todo), vec!["b"]);
        assert_eq!(store.state().ids(Column::InProgress), vec!["c", "a"]);
        let (_, moved) = store.state().find(&CardId::from("a")).unwrap();
        assert_eq!(moved.status, Status::Doing);
        assert_eq!(applied.previous_status, Status::Pending);
        assert_eq!(applied.from.index, 0);
        assert_eq!(store.version(), before + 1);
    }

    #[test]
    fn test_apply_move_missing_card_is_noop() {
        let mut store = seeded();
        let before = store.snapshot();
        let version = store.version();

        assert!(store
            .apply_move(&CardId::from("c"), Column::Todo, Column::Done)
            .is_none());
        assert!(store
            .apply_move(&CardId::from("zz"), Column::Todo, Column::Done)
            .is_none());

        assert_eq!(store.snapshot(), before);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_apply_delete() {
        let mut store = seeded();
        let removed = store.apply_delete(&CardId::from("b")).unwrap();
        assert_eq!(removed.from.column, Column::Todo);
        assert_eq!(removed.from.index, 1);
        assert_eq!(store.state().ids(Column::Todo), vec!["a"]);

        let version = store.version();
        assert!(store.apply_delete(&CardId::from("b")).is_none());
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_revert_move_restores_position_and_status() {
        let mut store = seeded();
        let before = store.snapshot();
        let applied = store
            .apply_move(&CardId::from("a"), Column::Todo, Column::Done)
            .unwrap();

        assert!(store.revert_move(&applied));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_revert_move_keeps_unrelated_changes() {
        let mut store = seeded();
        let applied = store
            .apply_move(&CardId::from("a"), Column::Todo, Column::Done)
            .unwrap();
        store.apply_delete(&CardId::from("c"));

        assert!(store.revert_move(&applied));
        assert_eq!(store.state().ids(Column::Todo), vec!["a", "b"]);
        assert!(store.state().cards(Column::InProgress).is_empty());
        assert!(store.state().cards(Column::Done).is_empty());
    }

    #[test]
    fn test_revert_move_after_card_vanished() {
        let mut store = seeded();
        let applied = store
            .apply_move(&CardId::from("a"), Column::Todo, Column::Done)
            .unwrap();
        store.apply_delete(&CardId::from("a"));

        assert!(!store.revert_move(&applied));
        assert!(!store.state().contains(&CardId::from("a")));
    }

    #[test]
    fn test_revert_delete() {
        let mut store = seeded();
        let before = store.snapshot();
        let applied = store.apply_delete(&CardId::from("a")).unwrap();

        assert!(store.revert_delete(&applied));
        assert_eq!(store.snapshot(), before);
        assert!(!store.revert_delete(&applied));
    }
}
