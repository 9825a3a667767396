use super::ExpenseCache;
use crate::models::{ExpenseForm, ExpenseId};

/// Association between the update modal and one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditSession {
    #[default]
    Closed,
    Open { id: ExpenseId, form: ExpenseForm },
}

impl EditSession {
    /// Looks `id` up in the full cache, not the current projection. An unknown
    /// id leaves the session exactly as it was.
    pub fn open_for(&mut self, cache: &ExpenseCache, id: ExpenseId) -> bool {
        match cache.find(id) {
            Some(expense) => {
                *self = Self::Open {
                    id,
                    form: ExpenseForm::from_expense(expense),
                };
                true
            }
            None => {
                tracing::debug!(expense_id = %id, "edit target not in cache; ignoring");
                false
            }
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn target(&self) -> Option<ExpenseId> {
        match self {
            Self::Open { id, .. } => Some(*id),
            Self::Closed => None,
        }
    }

    pub fn form(&self) -> Option<&ExpenseForm> {
        match self {
            Self::Open { form, .. } => Some(form),
            Self::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut ExpenseForm> {
        match self {
            Self::Open { form, .. } => Some(form),
            Self::Closed => None,
        }
    }
}
