//! Board state: the three column buckets and the partition that fills them

use super::card::Card;
use super::column::Column;
use super::ids::CardId;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// Column identity → ordered sequence of cards.
///
/// Always holds exactly three sequences, one per [`Column`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    columns: [Vec<Card>; 3],
}

/// Where a card sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub column: Column,
    pub index: usize,
}

impl BoardState {
    /// Three empty columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition a flat listing into columns by status.
    ///
    /// Listing order is preserved within each column. Cards whose status has
    /// no column are returned in [`Partition::dropped`].
    pub fn partition(cards: impl IntoIterator<Item = Card>) -> Partition {
        let mut board = Self::new();
        let mut dropped = Vec::new();

        for card in cards {
            match Column::for_status(&card.status) {
                Some(column) => board.columns[column.index()].push(card),
                None => dropped.push(card),
            }
        }

        Partition { board, dropped }
    }

    /// Cards in a column, in display order
    pub fn cards(&self, column: Column) -> &[Card] {
        &self.columns[column.index()]
    }

    pub(crate) fn cards_mut(&mut self, column: Column) -> &mut Vec<Card> {
        &mut self.columns[column.index()]
    }

    /// Iterate columns in display order
    pub fn iter(&self) -> impl Iterator<Item = (Column, &[Card])> {
        Column::ALL.into_iter().map(|c| (c, self.cards(c)))
    }

    /// Locate a card by id
    pub fn find(&self, id: &CardId) -> Option<(Placement, &Card)> {
        self.iter().find_map(|(column, cards)| {
            cards
                .iter()
                .position(|c| &c.id == id)
                .map(|index| (Placement { column, index }, &cards[index]))
        })
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.find(id).is_some()
    }

    /// Total number of cards across all columns
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Card ids in column order, for order-sensitive comparisons
    pub fn ids(&self, column: Column) -> Vec<&str> {
        self.cards(column).iter().map(|c| c.id.as_str()).collect()
    }

    /// Whether every card id appears at most once across the board
    pub fn ids_are_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .flatten()
            .all(|card| seen.insert(card.id.clone()))
    }
}

impl Serialize for BoardState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Column::ALL.len()))?;
        for (column, cards) in self.iter() {
            map.serialize_entry(&column, cards)?;
        }
        map.end()
    }
}

/// Result of partitioning a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub board: BoardState,
    /// Records whose status does not map to any column
    pub dropped: Vec<Card>,
}
