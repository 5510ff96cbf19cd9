//! Pure aggregation over ledger snapshots. No side effects, no storage.

use std::collections::BTreeMap;

use crate::domain::{Amounted, Category, Expense, Income};

/// Derived dashboard totals for one user's ledger.
///
/// `pending_expenses` is computed as `total − paid` so the three expense
/// figures always reconcile exactly, even under floating-point accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerTotals {
    pub total_expenses: f64,
    pub paid_expenses: f64,
    pub pending_expenses: f64,
    pub total_incomes: f64,
    pub net_balance: f64,
}

impl LedgerTotals {
    pub fn from_records(expenses: &[Expense], incomes: &[Income]) -> Self {
        let total_expenses = sum_amounts(expenses);
        let paid_expenses: f64 = expenses
            .iter()
            .filter(|expense| expense.is_paid)
            .map(|expense| expense.amount)
            .sum();
        let total_incomes = sum_amounts(incomes);
        Self {
            total_expenses,
            paid_expenses,
            pending_expenses: total_expenses - paid_expenses,
            total_incomes,
            net_balance: total_incomes - total_expenses,
        }
    }
}

/// Aggregation entry points consumed by dashboards and reports.
pub struct SummaryService;

impl SummaryService {
    pub fn totals(expenses: &[Expense], incomes: &[Income]) -> LedgerTotals {
        LedgerTotals::from_records(expenses, incomes)
    }

    /// Per-category expense totals, built in a single pass.
    ///
    /// Categories without expenses are absent from the map, never present
    /// with a zero.
    pub fn category_totals(expenses: &[Expense]) -> BTreeMap<Category, f64> {
        let mut totals = BTreeMap::new();
        for expense in expenses {
            *totals.entry(expense.category).or_insert(0.0) += expense.amount;
        }
        totals
    }
}

/// Sums amounts over any amount-bearing records.
pub fn sum_amounts<T: Amounted>(records: &[T]) -> f64 {
    records.iter().map(Amounted::amount).sum()
}

/// Formats a monetary value at two-decimal display precision.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordId, Recurrence};
    use chrono::NaiveDate;

    fn expense(id: &str, amount: f64, category: Category, is_paid: bool) -> Expense {
        Expense {
            id: RecordId::from(id),
            description: format!("expense {id}"),
            amount,
            due_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            category,
            recurrence: Recurrence::None,
            end_date: None,
            is_paid,
        }
    }

    fn income(id: &str, amount: f64) -> Income {
        Income {
            id: RecordId::from(id),
            description: format!("income {id}"),
            amount,
        }
    }

    #[test]
    fn dashboard_scenario_totals() {
        let expenses = [
            expense("e1", 500.0, Category::Moradia, true),
            expense("e2", 300.0, Category::Alimentacao, false),
        ];
        let incomes = [income("i1", 1000.0)];

        let totals = SummaryService::totals(&expenses, &incomes);
        assert_eq!(totals.total_expenses, 800.0);
        assert_eq!(totals.paid_expenses, 500.0);
        assert_eq!(totals.pending_expenses, 300.0);
        assert_eq!(totals.total_incomes, 1000.0);
        assert_eq!(totals.net_balance, 200.0);
    }

    #[test]
    fn paid_plus_pending_always_equals_total() {
        let expenses = [
            expense("e1", 0.1, Category::Lazer, true),
            expense("e2", 0.2, Category::Lazer, false),
            expense("e3", 0.3, Category::Outros, true),
        ];
        let totals = SummaryService::totals(&expenses, &[]);
        assert_eq!(
            totals.paid_expenses + totals.pending_expenses,
            totals.total_expenses
        );
    }

    #[test]
    fn net_balance_can_go_negative() {
        let expenses = [expense("e1", 900.0, Category::Saude, false)];
        let incomes = [income("i1", 250.0)];
        let totals = SummaryService::totals(&expenses, &incomes);
        assert_eq!(totals.net_balance, -650.0);
    }

    #[test]
    fn empty_collections_yield_zeroes() {
        let totals = SummaryService::totals(&[], &[]);
        assert_eq!(totals.total_expenses, 0.0);
        assert_eq!(totals.net_balance, 0.0);
    }

    #[test]
    fn category_totals_cover_exactly_the_present_categories() {
        let expenses = [
            expense("e1", 120.0, Category::Moradia, false),
            expense("e2", 80.0, Category::Moradia, true),
            expense("e3", 45.5, Category::Transporte, false),
        ];
        let totals = SummaryService::category_totals(&expenses);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&Category::Moradia], 200.0);
        assert_eq!(totals[&Category::Transporte], 45.5);
        assert!(!totals.contains_key(&Category::Lazer));
    }

    #[test]
    fn category_totals_of_empty_ledger_is_empty() {
        assert!(SummaryService::category_totals(&[]).is_empty());
    }

    #[test]
    fn amounts_format_at_two_decimals() {
        assert_eq!(format_amount(1234.5), "1234.50");
        assert_eq!(format_amount(0.0), "0.00");
    }
}
