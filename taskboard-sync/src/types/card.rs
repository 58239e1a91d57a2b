//! Card types: Card, Status, Priority, and the payloads sent to the task store

use super::ids::CardId;
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a card.
///
/// The wire contract accepts any string; values other than the three known
/// ones are kept verbatim as [`Status::Unrecognized`] so they survive a round
/// trip, but they have no column on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Pending,
    Doing,
    Completed,
    Unrecognized(String),
}

impl Status {
    /// The three statuses that place a card in a column
    pub const KNOWN: [Status; 3] = [Status::Pending, Status::Doing, Status::Completed];

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Doing => "doing",
            Self::Completed => "completed",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Self::Pending,
            "doing" => Self::Doing,
            "completed" => Self::Completed,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse for user input: only the three known statuses are accepted.
impl FromStr for Status {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match Status::from(s.trim().to_lowercase()) {
            Status::Unrecognized(raw) => Err(BoardError::invalid_value(
                "status",
                format!("unknown status '{}', expected pending, doing or completed", raw),
            )),
            status => Ok(status),
        }
    }
}

/// Card priority. A card without a (recognized) priority has `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Display label for a card without a priority
pub const NO_PRIORITY_LABEL: &str = "No priority";

/// Badge colour for a card without a priority
pub const NO_PRIORITY_COLOR: &str = "#6c757d";

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Lenient parse used for wire values; unknown or empty values yield `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Badge colour as a CSS hex string
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#28a745",
            Self::Medium => "#ffc107",
            Self::High => "#dc3545",
        }
    }

    /// Label for an optional priority, falling back to [`NO_PRIORITY_LABEL`]
    pub fn label_for(priority: Option<Priority>) -> &'static str {
        priority.map_or(NO_PRIORITY_LABEL, |p| p.label())
    }

    /// Colour for an optional priority, falling back to [`NO_PRIORITY_COLOR`]
    pub fn color_for(priority: Option<Priority>) -> &'static str {
        priority.map_or(NO_PRIORITY_COLOR, |p| p.color())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        Priority::parse(s).ok_or_else(|| {
            BoardError::invalid_value(
                "priority",
                format!("unknown priority '{}', expected low, medium or high", s),
            )
        })
    }
}

fn deserialize_priority<'de, D>(deserializer: D) -> std::result::Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient_text(Option::<Value>::deserialize(deserializer)?);
    Ok(raw.as_deref().and_then(Priority::parse))
}

/// Strings pass through, null yields `None`, other values are rendered as JSON
fn lenient_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(Option::<Value>::deserialize(deserializer)?).unwrap_or_default())
}

fn deserialize_status<'de, D>(deserializer: D) -> std::result::Result<Status, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(Option::<Value>::deserialize(deserializer)?)
        .map(Status::from)
        .unwrap_or_else(missing_status))
}

fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

fn missing_status() -> Status {
    Status::Unrecognized(String::new())
}

/// A task record as held by the remote store and displayed on the board.
///
/// Decoding never fails on a field value: null or mistyped fields fall back
/// to empty text, an unrecognized status, no priority or no timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: CardId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    /// A record without a status is kept but never placed in a column
    #[serde(default = "missing_status", deserialize_with = "deserialize_status")]
    pub status: Status,
    #[serde(
        default,
        deserialize_with = "deserialize_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
    /// `None` when the store sent no usable timestamp
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Build a card from a creation payload and the id the store assigned
    pub fn from_new(id: impl Into<CardId>, new: NewCard) -> Self {
        Self {
            id: id.into(),
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            created_at: Some(new.created_at),
        }
    }
}

/// Creation payload: a card without an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub title: String,
    pub description: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub created_at: DateTime<Utc>,
}

/// Values submitted by the create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardForm {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Option<Priority>,
}

impl CardForm {
    /// Create form values with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Pre-populate the form from an existing card for editing
    pub fn from_card(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            description: card.description.clone(),
            status: card.status.clone(),
            priority: card.priority,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Merge the form into an existing card. Id and creation time are kept.
    pub fn merge_into(&self, card: &Card) -> Card {
        Card {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            priority: self.priority,
            ..card.clone()
        }
    }

    /// Build the creation payload, stamping the creation time
    pub fn to_new_card(&self, created_at: DateTime<Utc>) -> NewCard {
        NewCard {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            priority: self.priority,
            created_at,
        }
    }
}

/// Body of an update call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskPatch {
    /// Minimal payload sent for a move
    Status { id: CardId, status: Status },
    /// Full record sent for an edit
    Full(Card),
}

impl TaskPatch {
    pub fn status(id: impl Into<CardId>, status: Status) -> Self {
        Self::Status {
            id: id.into(),
            status,
        }
    }

    pub fn full(card: Card) -> Self {
        Self::Full(card)
    }

    /// Apply this patch to a stored record
    pub fn apply_to(&self, card: &mut Card) {
        match self {
            Self::Status { status, .. } => card.status = status.clone(),
            Self::Full(full) => {
                let id = card.id.clone();
                *card = full.clone();
                card.id = id;
            }
        }
    }
}
