use rust_decimal::Decimal;
use std::fmt;

use crate::models::Expense;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Exactly `"all"`, or nothing at all, means no filtering. Anything else,
    /// including `"All"`, is an exact category match.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "all" {
            Self::All
        } else {
            Self::Only(raw.to_string())
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => expense.category == *category,
        }
    }

    /// Step through `All` and then each known category, wrapping around.
    pub fn cycle(&self, categories: &[String]) -> Self {
        let next = match self {
            Self::All => categories.first(),
            Self::Only(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| categories.get(i + 1)),
        };
        next.map_or(Self::All, |c| Self::Only(c.clone()))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    None,
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortOrder {
    pub fn all() -> &'static [SortOrder] {
        &[
            Self::None,
            Self::DateDesc,
            Self::DateAsc,
            Self::AmountDesc,
            Self::AmountAsc,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::AmountDesc => "amount-desc",
            Self::AmountAsc => "amount-asc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|s| s.as_str() == raw)
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|s| *s == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filtered then sorted copy of `records`. The sort is stable, so ties keep
/// their cache order; `SortOrder::None` keeps the filtered order untouched.
pub fn project(records: &[Expense], filter: &CategoryFilter, sort: SortOrder) -> Vec<Expense> {
    let mut out: Vec<Expense> = records.iter().filter(|e| filter.matches(e)).cloned().collect();
    match sort {
        SortOrder::None => {}
        SortOrder::DateDesc => out.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::DateAsc => out.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::AmountDesc => out.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortOrder::AmountAsc => out.sort_by(|a, b| a.amount.cmp(&b.amount)),
    }
    out
}

/// Spend per category over the full cache, largest first.
pub fn category_totals(records: &[Expense]) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for expense in records {
        match totals.iter_mut().find(|(name, _)| *name == expense.category) {
            Some((_, sum)) => *sum = sum.checked_add(expense.amount).unwrap_or(Decimal::MAX),
            None => totals.push((expense.category.clone(), expense.amount)),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}
