//! The Execute trait implemented by every engine operation

use super::notification::OperationKind;
use super::SyncEngine;
use crate::error::Result;
use async_trait::async_trait;

/// Result of a mutating operation that completed without error
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T = ()> {
    /// The remote call succeeded and local state was reconciled
    Applied(T),
    /// The card was not on the board; nothing was sent or changed
    Skipped,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Transform the applied value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Applied(value) => Outcome::Applied(f(value)),
            Self::Skipped => Outcome::Skipped,
        }
    }

    /// The applied value, if any
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Skipped => None,
        }
    }
}

/// An operation the engine can run
#[async_trait]
pub trait Execute: Send + Sync {
    type Output: Send;

    /// Which operation this is, for logging and notifications
    fn kind(&self) -> OperationKind;

    async fn execute(&self, engine: &SyncEngine) -> Result<Self::Output>;
}
