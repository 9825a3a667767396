use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identity of an expense record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    pub date: NaiveDate,
}

impl Expense {
    /// Date in the `YYYY-MM-DD` form the API speaks.
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Body of a create or update call. Only produced by `ExpenseForm::validate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDraft {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

/// Sum of `amount` over `records`. Amounts come from the server unchecked,
/// so an overflowing total saturates at `Decimal::MAX` instead of panicking.
pub fn total_amount<'a>(records: impl IntoIterator<Item = &'a Expense>) -> Decimal {
    let mut total = Decimal::ZERO;
    for expense in records {
        match total.checked_add(expense.amount) {
            Some(sum) => total = sum,
            None => {
                tracing::warn!(expense_id = %expense.id, "expense total overflowed");
                return Decimal::MAX;
            }
        }
    }
    total
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
