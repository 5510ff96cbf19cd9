//! Validated CRUD helpers for incomes.

use crate::auth::UserId;
use crate::domain::{Income, IncomeDoc, IncomePatch, RecordId};
use crate::errors::{LedgerError, Result};
use crate::store::{Collection, DocumentStore};

use super::parse_amount;

/// Candidate income prior to validation and id assignment.
#[derive(Debug, Clone)]
pub struct IncomeDraft {
    pub description: String,
    pub amount: f64,
}

/// Raw income form fields as a UI layer submits them.
#[derive(Debug, Clone, Default)]
pub struct IncomeInput {
    pub description: String,
    pub amount: String,
}

impl IncomeInput {
    /// Parses and validates the raw fields into a draft.
    pub fn into_draft(self) -> Result<IncomeDraft> {
        let draft = IncomeDraft {
            description: self.description,
            amount: parse_amount(&self.amount)?,
        };
        IncomeService::validate(&draft)?;
        Ok(draft)
    }
}

/// Provides validated CRUD helpers for one user's incomes.
pub struct IncomeService;

impl IncomeService {
    /// Validates and persists a new income, returning it with its id.
    pub fn add(store: &dyn DocumentStore, user: &UserId, draft: IncomeDraft) -> Result<Income> {
        Self::validate(&draft)?;
        let doc = IncomeDoc {
            description: draft.description.trim().to_string(),
            amount: draft.amount,
        };
        let fields = serde_json::to_value(&doc)?;
        let id = store.create(user, Collection::Incomes, fields)?;
        Ok(Income::from_doc(id, doc))
    }

    /// The full, unordered income collection for `user`.
    pub fn list(store: &dyn DocumentStore, user: &UserId) -> Result<Vec<Income>> {
        store
            .list_all(user, Collection::Incomes)?
            .into_iter()
            .map(|document| {
                let doc: IncomeDoc = serde_json::from_value(document.fields)?;
                Ok(Income::from_doc(document.id, doc))
            })
            .collect()
    }

    /// Applies a partial update to the stored income.
    pub fn update(
        store: &dyn DocumentStore,
        user: &UserId,
        id: &RecordId,
        patch: IncomePatch,
    ) -> Result<()> {
        if !patch.has_effect() {
            return Ok(());
        }
        store.update(user, Collection::Incomes, id, patch.into_fields())
    }

    /// Deletes the stored income permanently.
    pub fn remove(store: &dyn DocumentStore, user: &UserId, id: &RecordId) -> Result<()> {
        store.delete(user, Collection::Incomes, id)
    }

    pub(crate) fn validate(draft: &IncomeDraft) -> Result<()> {
        if draft.description.trim().is_empty() {
            return Err(LedgerError::Validation("description must not be empty".into()));
        }
        if !draft.amount.is_finite() || draft.amount < 0.0 {
            return Err(LedgerError::Validation(format!(
                "amount must be a non-negative number: {}",
                draft.amount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_with_comma_amount_parses() {
        let input = IncomeInput {
            description: "Salário".into(),
            amount: "4200,50".into(),
        };
        let draft = input.into_draft().unwrap();
        assert_eq!(draft.amount, 4200.5);
    }

    #[test]
    fn blank_description_is_rejected() {
        let input = IncomeInput {
            description: "".into(),
            amount: "100".into(),
        };
        assert!(matches!(
            input.into_draft().unwrap_err(),
            LedgerError::Validation(_)
        ));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let draft = IncomeDraft {
            description: "Venda".into(),
            amount: -10.0,
        };
        assert!(IncomeService::validate(&draft).is_err());
    }
}
