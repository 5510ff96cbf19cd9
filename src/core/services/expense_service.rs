//! Validated CRUD and the paid-toggle transition for expenses.

use chrono::NaiveDate;

use crate::auth::UserId;
use crate::domain::{
    Category, Expense, ExpenseDoc, ExpensePatch, Recurrence, RecordId,
};
use crate::errors::{LedgerError, Result};
use crate::store::{Collection, DocumentStore};

use super::parse_amount;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Recurrence choice on a new expense; parcel progress always starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceChoice {
    None,
    Monthly,
    Parceled { total_parcels: u32 },
}

/// Candidate expense prior to validation and id assignment.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub category: Category,
    pub recurrence: RecurrenceChoice,
    pub end_date: Option<NaiveDate>,
}

/// Raw expense form fields as a UI layer submits them.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub description: String,
    pub amount: String,
    pub due_date: String,
    pub category: String,
    pub is_recurring: bool,
    pub recurrence_type: Option<String>,
    pub total_parcels: Option<u32>,
    pub end_date: Option<String>,
}

impl ExpenseInput {
    /// Parses and validates the raw fields into a draft.
    pub fn into_draft(self) -> Result<ExpenseDraft> {
        let amount = parse_amount(&self.amount)?;
        let due_date = parse_date(&self.due_date)?;
        let category: Category = self.category.parse()?;
        let recurrence = if !self.is_recurring {
            RecurrenceChoice::None
        } else {
            match self.recurrence_type.as_deref() {
                None | Some("none") => RecurrenceChoice::None,
                Some("monthly") => RecurrenceChoice::Monthly,
                Some("parceled") => {
                    let total_parcels = self.total_parcels.ok_or_else(|| {
                        LedgerError::Validation("parceled expenses need a parcel count".into())
                    })?;
                    RecurrenceChoice::Parceled { total_parcels }
                }
                Some(other) => {
                    return Err(LedgerError::Validation(format!(
                        "unknown recurrence type: {other}"
                    )))
                }
            }
        };
        let end_date = match self.end_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw)?),
        };
        let draft = ExpenseDraft {
            description: self.description,
            amount,
            due_date,
            category,
            recurrence,
            end_date,
        };
        ExpenseService::validate(&draft)?;
        Ok(draft)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| LedgerError::Validation(format!("invalid date: {raw}")))
}

/// Provides validated CRUD helpers for one user's expenses.
pub struct ExpenseService;

impl ExpenseService {
    /// Validates and persists a new expense, returning it with its id.
    ///
    /// New expenses start unpaid; a parceled plan starts at parcel 1.
    pub fn add(store: &dyn DocumentStore, user: &UserId, draft: ExpenseDraft) -> Result<Expense> {
        Self::validate(&draft)?;
        let recurrence = match draft.recurrence {
            RecurrenceChoice::None => Recurrence::None,
            RecurrenceChoice::Monthly => Recurrence::Monthly,
            RecurrenceChoice::Parceled { total_parcels } => Recurrence::Parceled {
                current_parcel: 1,
                total_parcels,
            },
        };
        let (total_parcels, current_parcel) = match recurrence {
            Recurrence::Parceled {
                current_parcel,
                total_parcels,
            } => (Some(total_parcels), Some(current_parcel)),
            _ => (None, None),
        };
        let doc = ExpenseDoc {
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            due_date: draft.due_date,
            category: draft.category,
            is_recurring: recurrence.is_recurring(),
            recurrence_type: Some(recurrence.recurrence_type()),
            total_parcels,
            current_parcel,
            end_date: draft.end_date,
            is_paid: false,
        };
        let fields = serde_json::to_value(&doc)?;
        let id = store.create(user, Collection::Expenses, fields)?;
        Expense::from_doc(id, doc)
    }

    /// The full, unordered expense collection for `user`.
    pub fn list(store: &dyn DocumentStore, user: &UserId) -> Result<Vec<Expense>> {
        store
            .list_all(user, Collection::Expenses)?
            .into_iter()
            .map(|document| {
                let doc: ExpenseDoc = serde_json::from_value(document.fields)?;
                Expense::from_doc(document.id, doc)
            })
            .collect()
    }

    /// Applies a partial update to the stored expense.
    pub fn update(
        store: &dyn DocumentStore,
        user: &UserId,
        id: &RecordId,
        patch: ExpensePatch,
    ) -> Result<()> {
        if !patch.has_effect() {
            return Ok(());
        }
        store.update(user, Collection::Expenses, id, patch.into_fields())
    }

    /// Deletes the stored expense permanently.
    pub fn remove(store: &dyn DocumentStore, user: &UserId, id: &RecordId) -> Result<()> {
        store.delete(user, Collection::Expenses, id)
    }

    /// Runs the paid-toggle transition against the stored record.
    pub fn toggle_paid(store: &dyn DocumentStore, user: &UserId, expense: &Expense) -> Result<()> {
        let next = expense.toggled_paid();
        let mut patch = ExpensePatch {
            is_paid: Some(next.is_paid),
            ..ExpensePatch::default()
        };
        if next.recurrence != expense.recurrence {
            if let Recurrence::Parceled { current_parcel, .. } = next.recurrence {
                patch.current_parcel = Some(current_parcel);
            }
        }
        Self::update(store, user, &expense.id, patch)
    }

    pub(crate) fn validate(draft: &ExpenseDraft) -> Result<()> {
        if draft.description.trim().is_empty() {
            return Err(LedgerError::Validation("description must not be empty".into()));
        }
        if !draft.amount.is_finite() || draft.amount < 0.0 {
            return Err(LedgerError::Validation(format!(
                "amount must be a non-negative number: {}",
                draft.amount
            )));
        }
        if let RecurrenceChoice::Parceled { total_parcels } = draft.recurrence {
            if total_parcels == 0 {
                return Err(LedgerError::Validation(
                    "parcel count must be at least 1".into(),
                ));
            }
        }
        Ok(())
    }
}
