//! Column identity and the status mapping
//!
//! The board has exactly three columns. This module is the only place that
//! knows which status belongs to which column.

use super::card::Status;
use crate::error::{BoardError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the three fixed board lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    /// All columns in display order
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Done];

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Short machine name, also accepted by [`FromStr`]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Position in display order
    pub fn index(&self) -> usize {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Status a card takes on when placed in this column
    pub fn status(&self) -> Status {
        column_to_status(*self)
    }

    /// Column a card with this status is displayed under
    pub fn for_status(status: &Status) -> Option<Column> {
        status_to_column(status)
    }
}

/// Map a column to its status. Total over the three columns.
pub fn column_to_status(column: Column) -> Status {
    match column {
        Column::Todo => Status::Pending,
        Column::InProgress => Status::Doing,
        Column::Done => Status::Completed,
    }
}

/// Map a status to its column. Total over the three known statuses;
/// an unrecognized status has no column.
pub fn status_to_column(status: &Status) -> Option<Column> {
    match status {
        Status::Pending => Some(Column::Todo),
        Status::Doing => Some(Column::InProgress),
        Status::Completed => Some(Column::Done),
        Status::Unrecognized(_) => None,
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Column {
    type Err = BoardError;

    /// Accepts the slug or the display title, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Column::ALL
            .into_iter()
            .find(|c| c.slug() == wanted || c.title().to_lowercase() == wanted)
            .ok_or_else(|| {
                BoardError::invalid_value(
                    "column",
                    format!("unknown column '{}', expected todo, in-progress or done", s),
                )
            })
    }
}
