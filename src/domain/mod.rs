pub mod common;
pub mod expense;
pub mod income;

pub use common::{Amounted, Displayable, Identifiable, RecordId};
pub use expense::{Category, Expense, ExpenseDoc, ExpensePatch, Recurrence, RecurrenceType};
pub use income::{Income, IncomeDoc, IncomePatch};
