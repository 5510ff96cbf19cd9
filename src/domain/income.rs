//! Domain types for income records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::common::{Amounted, Displayable, Identifiable, RecordId};

/// One inflow belonging to a single user.
#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: RecordId,
    pub description: String,
    pub amount: f64,
}

impl Income {
    /// Rebuilds an income from its stored document and key.
    pub fn from_doc(id: RecordId, doc: IncomeDoc) -> Self {
        Self {
            id,
            description: doc.description,
            amount: doc.amount,
        }
    }

    /// Stored-document shape of this income (the id lives on the key).
    pub fn to_doc(&self) -> IncomeDoc {
        IncomeDoc {
            description: self.description.clone(),
            amount: self.amount,
        }
    }
}

impl Identifiable for Income {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Amounted for Income {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Income {
    fn display_label(&self) -> String {
        self.description.clone()
    }
}

/// Flat stored-document layout for an income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeDoc {
    pub description: String,
    pub amount: f64,
}

/// Partial field changes applied to a stored income.
#[derive(Debug, Clone, Default)]
pub struct IncomePatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
}

impl IncomePatch {
    pub fn has_effect(&self) -> bool {
        self.description.is_some() || self.amount.is_some()
    }

    /// Wire field changes in stored-document shape.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(description) = self.description {
            fields.insert("description".into(), Value::String(description));
        }
        if let Some(amount) = self.amount {
            fields.insert("amount".into(), json!(amount));
        }
        fields
    }
}
