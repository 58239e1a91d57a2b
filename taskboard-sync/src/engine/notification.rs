//! Notifications published when an operation completes

use serde::Serialize;
use std::fmt;

/// Operations the engine performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Fetch,
    Move,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    /// Message shown when the operation succeeds
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Fetch => "Board loaded.",
            Self::Move => "Card moved successfully!",
            Self::Create => "Card created successfully!",
            Self::Update => "Card updated successfully!",
            Self::Delete => "Card deleted successfully!",
        }
    }

    /// Message shown when the operation fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Fetch => "Failed to load the board.",
            Self::Move => "Failed to move the card.",
            Self::Create => "Failed to create the card.",
            Self::Update => "Failed to update the card.",
            Self::Delete => "Failed to delete the card.",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Move => "move",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// User-facing outcome of one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub operation: OperationKind,
    pub message: String,
}

impl Notification {
    pub fn success(operation: OperationKind) -> Self {
        Self {
            severity: Severity::Success,
            operation,
            message: operation.success_message().to_string(),
        }
    }

    pub fn failure(operation: OperationKind) -> Self {
        Self {
            severity: Severity::Error,
            operation,
            message: operation.failure_message().to_string(),
        }
    }

    /// Short heading for the notification
    pub fn summary(&self) -> &'static str {
        match self.severity {
            Severity::Success => "Success",
            Severity::Error => "Error",
        }
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary(), self.message)
    }
}
