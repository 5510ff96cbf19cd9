//! Domain types for monthly expense records and their recurrence rules.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{LedgerError, Result};

use super::common::{Amounted, Displayable, Identifiable, RecordId};

/// Fixed reporting categories applied to expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Moradia,
    Alimentacao,
    Transporte,
    Saude,
    Educacao,
    Lazer,
    Outros,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Moradia,
        Category::Alimentacao,
        Category::Transporte,
        Category::Saude,
        Category::Educacao,
        Category::Lazer,
        Category::Outros,
    ];

    /// Wire slug used in stored documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Moradia => "moradia",
            Category::Alimentacao => "alimentacao",
            Category::Transporte => "transporte",
            Category::Saude => "saude",
            Category::Educacao => "educacao",
            Category::Lazer => "lazer",
            Category::Outros => "outros",
        }
    }

    /// Human-facing label for report tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::Moradia => "Moradia",
            Category::Alimentacao => "Alimentação",
            Category::Transporte => "Transporte",
            Category::Saude => "Saúde",
            Category::Educacao => "Educação",
            Category::Lazer => "Lazer",
            Category::Outros => "Outros",
        }
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| LedgerError::Validation(format!("unknown category: {value}")))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wire tag for the recurrence classification of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    None,
    Monthly,
    Parceled,
}

/// How an expense repeats. Parcel counters exist only for parceled plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    None,
    Monthly,
    Parceled {
        current_parcel: u32,
        total_parcels: u32,
    },
}

impl Recurrence {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::None)
    }

    pub fn recurrence_type(&self) -> RecurrenceType {
        match self {
            Recurrence::None => RecurrenceType::None,
            Recurrence::Monthly => RecurrenceType::Monthly,
            Recurrence::Parceled { .. } => RecurrenceType::Parceled,
        }
    }

    /// `current/total` progress label for parceled plans.
    pub fn parcel_label(&self) -> Option<String> {
        match self {
            Recurrence::Parceled {
                current_parcel,
                total_parcels,
            } => Some(format!("{current_parcel}/{total_parcels}")),
            _ => None,
        }
    }
}

/// One billable obligation belonging to a single user.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: RecordId,
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub category: Category,
    pub recurrence: Recurrence,
    pub end_date: Option<NaiveDate>,
    pub is_paid: bool,
}

impl Expense {
    /// Applies the paid-toggle transition, returning the next record state.
    ///
    /// Marking paid advances a parceled plan by one installment; marking
    /// unpaid only clears the flag and never rewinds the parcel counter.
    pub fn toggled_paid(&self) -> Self {
        let mut next = self.clone();
        next.is_paid = !self.is_paid;
        if !self.is_paid {
            if let Recurrence::Parceled { current_parcel, .. } = &mut next.recurrence {
                *current_parcel += 1;
            }
        }
        next
    }

    /// Rebuilds an expense from its stored document and key.
    pub fn from_doc(id: RecordId, doc: ExpenseDoc) -> Result<Self> {
        let recurrence = if !doc.is_recurring {
            Recurrence::None
        } else {
            match doc.recurrence_type.unwrap_or_default() {
                RecurrenceType::None => Recurrence::None,
                RecurrenceType::Monthly => Recurrence::Monthly,
                RecurrenceType::Parceled => {
                    let total_parcels = doc.total_parcels.ok_or_else(|| {
                        LedgerError::Persistence(format!(
                            "expense {id} is parceled but has no totalParcels"
                        ))
                    })?;
                    let current_parcel = doc.current_parcel.unwrap_or(1);
                    if total_parcels == 0 || current_parcel == 0 {
                        return Err(LedgerError::Persistence(format!(
                            "expense {id} has a non-positive parcel counter"
                        )));
                    }
                    Recurrence::Parceled {
                        current_parcel,
                        total_parcels,
                    }
                }
            }
        };
        Ok(Self {
            id,
            description: doc.description,
            amount: doc.amount,
            due_date: doc.due_date,
            category: doc.category,
            recurrence,
            end_date: doc.end_date,
            is_paid: doc.is_paid,
        })
    }

    /// Stored-document shape of this expense (the id lives on the key).
    pub fn to_doc(&self) -> ExpenseDoc {
        let (total_parcels, current_parcel) = match self.recurrence {
            Recurrence::Parceled {
                current_parcel,
                total_parcels,
            } => (Some(total_parcels), Some(current_parcel)),
            _ => (None, None),
        };
        ExpenseDoc {
            description: self.description.clone(),
            amount: self.amount,
            due_date: self.due_date,
            category: self.category,
            is_recurring: self.recurrence.is_recurring(),
            recurrence_type: Some(self.recurrence.recurrence_type()),
            total_parcels,
            current_parcel,
            end_date: self.end_date,
            is_paid: self.is_paid,
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        match self.recurrence.parcel_label() {
            Some(label) => format!("{} (Parcela {label})", self.description),
            None => self.description.clone(),
        }
    }
}

/// Flat stored-document layout for an expense, matching the wire field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDoc {
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub category: Category,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_parcels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_parcel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub is_paid: bool,
}

/// Partial field changes applied to a stored expense.
///
/// Unset fields stay untouched; `end_date` uses a double `Option` so it can
/// be cleared. Setting `recurrence` rewrites the whole recurrence group so
/// parcel counters never survive a switch away from a parceled plan.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub recurrence: Option<Recurrence>,
    pub end_date: Option<Option<NaiveDate>>,
    pub is_paid: Option<bool>,
    pub current_parcel: Option<u32>,
}

impl ExpensePatch {
    pub fn has_effect(&self) -> bool {
        self.description.is_some()
            || self.amount.is_some()
            || self.due_date.is_some()
            || self.category.is_some()
            || self.recurrence.is_some()
            || self.end_date.is_some()
            || self.is_paid.is_some()
            || self.current_parcel.is_some()
    }

    /// Wire field changes in stored-document shape. `Null` values signal the
    /// store to drop the field.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(description) = self.description {
            fields.insert("description".into(), Value::String(description));
        }
        if let Some(amount) = self.amount {
            fields.insert("amount".into(), json!(amount));
        }
        if let Some(due_date) = self.due_date {
            fields.insert("dueDate".into(), json!(due_date));
        }
        if let Some(category) = self.category {
            fields.insert("category".into(), json!(category));
        }
        if let Some(recurrence) = self.recurrence {
            fields.insert("isRecurring".into(), json!(recurrence.is_recurring()));
            fields.insert(
                "recurrenceType".into(),
                json!(recurrence.recurrence_type()),
            );
            match recurrence {
                Recurrence::Parceled {
                    current_parcel,
                    total_parcels,
                } => {
                    fields.insert("totalParcels".into(), json!(total_parcels));
                    fields.insert("currentParcel".into(), json!(current_parcel));
                }
                _ => {
                    fields.insert("totalParcels".into(), Value::Null);
                    fields.insert("currentParcel".into(), Value::Null);
                }
            }
        }
        if let Some(end_date) = self.end_date {
            fields.insert(
                "endDate".into(),
                end_date.map_or(Value::Null, |date| json!(date)),
            );
        }
        if let Some(is_paid) = self.is_paid {
            fields.insert("isPaid".into(), json!(is_paid));
        }
        if let Some(current_parcel) = self.current_parcel {
            fields.insert("currentParcel".into(), json!(current_parcel));
        }
        fields
    }
}
