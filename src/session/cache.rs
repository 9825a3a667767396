use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::models::{total_amount, Expense, ExpenseId};

/// The last successful full fetch, replaced wholesale and never patched.
#[derive(Debug, Default)]
pub struct ExpenseCache {
    records: Vec<Expense>,
    fetch_error: Option<String>,
}

impl ExpenseCache {
    pub fn load(&mut self, records: Vec<Expense>) {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(dup) = records.iter().find(|e| !seen.insert(e.id)) {
            tracing::warn!(expense_id = %dup.id, "server returned duplicate expense id");
        }
        self.records = records;
        self.fetch_error = None;
    }

    /// A failed fetch empties the cache rather than leaving stale rows on screen.
    pub fn invalidate(&mut self, reason: impl Into<String>) {
        self.records.clear();
        self.fetch_error = Some(reason.into());
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn find(&self, id: ExpenseId) -> Option<&Expense> {
        self.records.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> Decimal {
        total_amount(&self.records)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|e| seen.insert(e.category.as_str()))
            .map(|e| e.category.clone())
            .collect()
    }
}
