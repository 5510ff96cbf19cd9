//! Shared traits and identifier types for ledger records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque record identifier assigned by the persistence layer.
///
/// Unique within one user's collection; carries no ordering or meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Mints a fresh identifier. Only storage backends should call this.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Exposes a stable identifier for records stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> &RecordId;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts a record into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}
