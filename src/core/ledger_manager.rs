//! Facade coordinating identity, persistence, and the in-memory snapshot.
//!
//! Every successful write is followed by a full re-fetch of the affected
//! user's collections, so the snapshot always mirrors the backend. A failed
//! operation propagates its error and leaves the prior snapshot untouched.

use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::{AuthEvent, IdentityProvider, UserId};
use crate::core::services::{
    ExpenseDraft, ExpenseService, IncomeDraft, IncomeService, LedgerTotals, SummaryService,
};
use crate::domain::{Category, Expense, ExpensePatch, Income, IncomePatch, RecordId};
use crate::errors::{LedgerError, Result};
use crate::store::DocumentStore;

/// In-memory view of one user's ledger, refreshed after every write.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub user: UserId,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub loaded_at: DateTime<Utc>,
}

/// Coordinates the document store and identity provider for one session.
pub struct LedgerManager {
    store: Box<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    auth_events: Receiver<AuthEvent>,
    snapshot: Option<LedgerSnapshot>,
}

impl LedgerManager {
    pub fn new(store: Box<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        let auth_events = identity.subscribe();
        Self {
            store,
            identity,
            auth_events,
            snapshot: None,
        }
    }

    pub fn snapshot(&self) -> Option<&LedgerSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.expenses.as_slice())
            .unwrap_or(&[])
    }

    pub fn incomes(&self) -> &[Income] {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.incomes.as_slice())
            .unwrap_or(&[])
    }

    /// Re-fetches both collections for the authenticated user.
    pub fn reload(&mut self) -> Result<()> {
        let user = self.require_user()?;
        let expenses = ExpenseService::list(self.store.as_ref(), &user)?;
        let incomes = IncomeService::list(self.store.as_ref(), &user)?;
        tracing::info!(
            user = %user,
            expenses = expenses.len(),
            incomes = incomes.len(),
            "ledger snapshot reloaded"
        );
        self.snapshot = Some(LedgerSnapshot {
            user,
            expenses,
            incomes,
            loaded_at: Utc::now(),
        });
        Ok(())
    }

    /// Drains pending auth notifications: reloads on sign-in, clears the
    /// snapshot on sign-out.
    pub fn process_auth_events(&mut self) -> Result<()> {
        while let Ok(event) = self.auth_events.try_recv() {
            match event {
                AuthEvent::SignedIn(_) => self.reload()?,
                AuthEvent::SignedOut => self.snapshot = None,
            }
        }
        Ok(())
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<RecordId> {
        let user = self.require_user()?;
        let expense = ExpenseService::add(self.store.as_ref(), &user, draft)?;
        self.reload()?;
        Ok(expense.id)
    }

    pub fn edit_expense(&mut self, id: &RecordId, patch: ExpensePatch) -> Result<()> {
        let user = self.require_user()?;
        ExpenseService::update(self.store.as_ref(), &user, id, patch)?;
        self.reload()
    }

    /// Applies the paid-toggle transition to the expense identified by `id`.
    pub fn toggle_expense_paid(&mut self, id: &RecordId) -> Result<()> {
        let user = self.require_user()?;
        if self.snapshot.is_none() {
            self.reload()?;
        }
        let expense = self
            .expenses()
            .iter()
            .find(|expense| &expense.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound {
                collection: "expenses",
                id: id.to_string(),
            })?;
        ExpenseService::toggle_paid(self.store.as_ref(), &user, &expense)?;
        self.reload()
    }

    pub fn remove_expense(&mut self, id: &RecordId) -> Result<()> {
        let user = self.require_user()?;
        ExpenseService::remove(self.store.as_ref(), &user, id)?;
        self.reload()
    }

    pub fn add_income(&mut self, draft: IncomeDraft) -> Result<RecordId> {
        let user = self.require_user()?;
        let income = IncomeService::add(self.store.as_ref(), &user, draft)?;
        self.reload()?;
        Ok(income.id)
    }

    pub fn edit_income(&mut self, id: &RecordId, patch: IncomePatch) -> Result<()> {
        let user = self.require_user()?;
        IncomeService::update(self.store.as_ref(), &user, id, patch)?;
        self.reload()
    }

    pub fn remove_income(&mut self, id: &RecordId) -> Result<()> {
        let user = self.require_user()?;
        IncomeService::remove(self.store.as_ref(), &user, id)?;
        self.reload()
    }

    /// Dashboard totals over the current snapshot.
    pub fn totals(&self) -> LedgerTotals {
        SummaryService::totals(self.expenses(), self.incomes())
    }

    /// Per-category report over the current snapshot.
    pub fn category_totals(&self) -> BTreeMap<Category, f64> {
        SummaryService::category_totals(self.expenses())
    }

    fn require_user(&self) -> Result<UserId> {
        self.identity
            .current_user()
            .ok_or(LedgerError::NotAuthenticated)
    }
}
