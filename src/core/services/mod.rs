pub mod expense_service;
pub mod income_service;
pub mod summary_service;

pub use expense_service::{ExpenseDraft, ExpenseInput, ExpenseService, RecurrenceChoice};
pub use income_service::{IncomeDraft, IncomeInput, IncomeService};
pub use summary_service::{format_amount, LedgerTotals, SummaryService};

use crate::errors::{LedgerError, Result};

/// Parses a user-entered amount, accepting a comma decimal separator.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(LedgerError::Validation("amount is required".into()));
    }
    let value: f64 = normalized
        .parse()
        .map_err(|_| LedgerError::Validation(format!("invalid amount: {raw}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(LedgerError::Validation(format!(
            "amount must be a non-negative number: {raw}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_comma_decimal_separator() {
        assert_eq!(parse_amount("1234,56").unwrap(), 1234.56);
        assert_eq!(parse_amount(" 10.5 ").unwrap(), 10.5);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
    }

    #[test]
    fn rejects_negative_empty_and_garbage() {
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("1.234,56").is_err());
    }
}
