//! Core types for the board

mod board;
mod card;
mod column;
mod ids;

// Re-export all types
pub use board::{BoardState, Partition, Placement};
pub use card::{
    Card, CardForm, NewCard, Priority, Status, TaskPatch, NO_PRIORITY_COLOR, NO_PRIORITY_LABEL,
};
pub use column::{column_to_status, status_to_column, Column};
pub use ids::CardId;
