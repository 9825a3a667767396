mod expense;
mod form;

pub use expense::{total_amount, Expense, ExpenseDraft, ExpenseId};
pub use form::{ExpenseForm, FormField, ValidationError};
pub(crate) use form::parse_positive;
