//! Persistence collaborator: per-user document collections.
//!
//! The ledger sees an opaque document store. Each user owns two fully
//! isolated collections, `expenses` and `incomes`; there is no cross-user
//! read or write path at this layer.

pub mod json_backend;

use std::fmt;

use serde_json::{Map, Value};

use crate::auth::UserId;
use crate::domain::RecordId;
use crate::errors::Result;

pub use json_backend::JsonStore;

/// Logical collections kept per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Expenses,
    Incomes,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Expenses => "expenses",
            Collection::Incomes => "incomes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored record: its identifier plus raw document fields.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: RecordId,
    pub fields: Value,
}

/// Abstraction over document stores holding per-user record collections.
///
/// Every call is an independent request-response operation; the caller owns
/// consistency (last write wins, re-read after write).
pub trait DocumentStore: Send + Sync {
    /// Stores a new document and returns its freshly assigned identifier.
    fn create(&self, user: &UserId, collection: Collection, fields: Value) -> Result<RecordId>;

    /// The complete, unordered collection belonging to `user`.
    fn list_all(&self, user: &UserId, collection: Collection) -> Result<Vec<Document>>;

    /// Merges `changes` into an existing document. Fields not mentioned are
    /// unchanged; `Null` values remove the field.
    fn update(
        &self,
        user: &UserId,
        collection: Collection,
        id: &RecordId,
        changes: Map<String, Value>,
    ) -> Result<()>;

    /// Removes a document permanently.
    fn delete(&self, user: &UserId, collection: Collection, id: &RecordId) -> Result<()>;
}
