use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{Expense, ExpenseDraft};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,
    #[error("Amount must be a number greater than 0 (got '{0}')")]
    InvalidAmount(String),
    #[error("Amount must not exceed 1000000000000000 (got '{0}')")]
    AmountTooLarge(String),
    #[error("Category must not be empty")]
    EmptyCategory,
    #[error("Date is required")]
    MissingDate,
    #[error("Date must look like YYYY-MM-DD (got '{0}')")]
    InvalidDate(String),
    #[error("Please enter a valid monthly limit greater than 0 (got '{0}')")]
    InvalidLimit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Amount,
    Category,
    Date,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[Self::Title, Self::Amount, Self::Category, Self::Date]
    }

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Amount,
            Self::Amount => Self::Category,
            Self::Category => Self::Date,
            Self::Date => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Date,
            Self::Amount => Self::Title,
            Self::Category => Self::Amount,
            Self::Date => Self::Category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Date => "Date",
        }
    }
}

/// Raw text of the entry and edit forms, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl ExpenseForm {
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            title: expense.title.clone(),
            amount: expense.amount.normalize().to_string(),
            category: expense.category.clone(),
            date: expense.date_str(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Amount => &self.amount,
            FormField::Category => &self.category,
            FormField::Date => &self.date,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Amount => &mut self.amount,
            FormField::Category => &mut self.category,
            FormField::Date => &mut self.date,
        }
    }

    /// Shared rule for create and update drafts. Reports the first bad field.
    pub fn validate(&self) -> Result<ExpenseDraft, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let amount = parse_positive(&self.amount).map_err(|rejected| {
            let raw = self.amount.trim().to_string();
            match rejected {
                Rejected::NotPositive => ValidationError::InvalidAmount(raw),
                Rejected::TooLarge => ValidationError::AmountTooLarge(raw),
            }
        })?;

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        let date_raw = self.date.trim();
        if date_raw.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date_raw.to_string()))?;

        Ok(ExpenseDraft {
            title: title.to_string(),
            amount,
            category: category.to_string(),
            date,
        })
    }
}

/// Largest amount a form or limit accepts. Far below `Decimal::MAX`, so
/// totals over any realistic record count cannot overflow.
pub(crate) const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Why `parse_positive` turned an input down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejected {
    NotPositive,
    TooLarge,
}

/// Parses a finite decimal in `(0, MAX_AMOUNT]`. `NaN`, `inf` and
/// non-numbers are `NotPositive`; finite numbers past the cap (including ones
/// `Decimal` cannot hold, like `1e100`) are `TooLarge`.
pub(crate) fn parse_positive(raw: &str) -> Result<Decimal, Rejected> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Rejected::NotPositive);
    }
    let value = match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        Ok(value) => value,
        Err(_) => {
            return match raw.parse::<f64>() {
                Ok(f) if f.is_finite() && f > MAX_AMOUNT as f64 => Err(Rejected::TooLarge),
                _ => Err(Rejected::NotPositive),
            };
        }
    };
    if value <= Decimal::ZERO {
        Err(Rejected::NotPositive)
    } else if value > Decimal::from(MAX_AMOUNT) {
        Err(Rejected::TooLarge)
    } else {
        Ok(value)
    }
}
