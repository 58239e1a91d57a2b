//! Card identifier

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque card identifier assigned by the remote task store.
///
/// Empty until the store assigns one on creation. Stores that hand out
/// numeric ids are accepted on read; the id is always written back as a
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Wrap an existing identifier
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The unassigned identifier of a card that has not been created yet
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the remote store has assigned this identifier
    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&CardId> for CardId {
    fn from(id: &CardId) -> Self {
        id.clone()
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
            Missing(()),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
            RawId::Missing(()) => Self::unassigned(),
        })
    }
}
