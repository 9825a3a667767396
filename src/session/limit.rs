use rust_decimal::Decimal;

use crate::models::{parse_positive, total_amount, Expense, ValidationError};
use crate::ui::util::format_money;

/// User-set spending threshold. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyLimit(Decimal);

impl Default for MonthlyLimit {
    fn default() -> Self {
        Self(Decimal::from(20_000))
    }
}

impl MonthlyLimit {
    pub const STORAGE_KEY: &'static str = "monthlyLimit";

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        parse_positive(raw)
            .map(Self)
            .map_err(|_| ValidationError::InvalidLimit(raw.trim().to_string()))
    }

    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|r| Self::parse(r).ok()).unwrap_or_default()
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn to_storage(self) -> String {
        self.0.normalize().to_string()
    }

    pub fn label(self) -> String {
        format!("Current Monthly Limit: {}", format_money(self.0, 0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitStatus {
    pub limit: MonthlyLimit,
    pub spent: Decimal,
    pub exceeded: bool,
}

impl LimitStatus {
    pub fn label(&self) -> String {
        self.limit.label()
    }

    pub fn message(&self) -> String {
        let limit = format_money(self.limit.amount(), 0);
        let spent = format_money(self.spent, 2);
        if self.exceeded {
            format!("⚠️ Limit exceeded — Limit: {limit} | Spent: {spent}")
        } else {
            format!("✅ Current Limit: {limit} | Spent: {spent}")
        }
    }
}

/// Compares total spend over every cached record against the limit. The
/// active filter never narrows this sum.
pub fn evaluate(records: &[Expense], limit: MonthlyLimit) -> LimitStatus {
    let spent = total_amount(records);
    LimitStatus {
        limit,
        spent,
        exceeded: spent > limit.amount(),
    }
}
