//! Client session state.
//!
//! The cache holds exactly the last successful full fetch. Every view (table,
//! totals, limit banner) is derived from it on demand, and every successful
//! mutation asks for a fresh `List` instead of patching it.

mod cache;
mod edit;
mod limit;
mod projection;

pub use cache::ExpenseCache;
pub use edit::EditSession;
pub use limit::{evaluate, LimitStatus, MonthlyLimit};
pub use projection::{category_totals, project, CategoryFilter, SortOrder};

use anyhow::Result;

use crate::api::{self, ApiError, ExpenseStore, Outcome, Request};
use crate::db::Database;
use crate::models::{Expense, ExpenseForm, ExpenseId, ValidationError};
use crate::ui::util::format_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Where user-facing messages go.
pub trait Notify {
    fn notify(&mut self, notice: Notice);
}

/// A `Notify` that can also ask a yes/no question.
pub trait UserPrompt: Notify {
    fn confirm(&mut self, question: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Error fetching expenses from backend: {0}")]
    Fetch(#[source] ApiError),
    #[error("Error adding expense: {0}")]
    Create(#[source] ApiError),
    #[error("Failed to update expense {id}: {source}")]
    Update { id: ExpenseId, source: ApiError },
    #[error("Failed to delete expense {id}: {source}")]
    Delete { id: ExpenseId, source: ApiError },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Expense {0} no longer exists")]
    StaleReference(ExpenseId),
}

fn report(notify: &mut impl Notify, err: SessionError) {
    match err {
        SessionError::Validation(_) => tracing::debug!(error = %err, "rejected input"),
        _ => tracing::warn!(error = %err, "expense operation failed"),
    }
    notify.notify(Notice::error(err.to_string()));
}

#[derive(Debug, Default)]
pub struct Session {
    cache: ExpenseCache,
    pub filter: CategoryFilter,
    pub sort: SortOrder,
    limit: MonthlyLimit,
    edit: EditSession,
    /// Entry form for new expenses; cleared after a successful create.
    pub entry: ExpenseForm,
    pending_delete: Option<ExpenseId>,
}

impl Session {
    pub fn new(limit: MonthlyLimit) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn cache(&self) -> &ExpenseCache {
        &self.cache
    }

    pub fn limit(&self) -> MonthlyLimit {
        self.limit
    }

    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut ExpenseForm> {
        self.edit.form_mut()
    }

    pub fn projection(&self) -> Vec<Expense> {
        project(self.cache.records(), &self.filter, self.sort)
    }

    pub fn limit_status(&self) -> LimitStatus {
        evaluate(self.cache.records(), self.limit)
    }

    pub fn refresh(&self) -> Request {
        Request::List
    }

    /// Accepts only finite numbers above zero. On acceptance the value is
    /// persisted and the limit re-evaluated; on rejection nothing changes.
    pub fn set_limit(
        &mut self,
        raw: &str,
        db: &Database,
        notify: &mut impl Notify,
    ) -> Result<Option<LimitStatus>> {
        let limit = match MonthlyLimit::parse(raw) {
            Ok(limit) => limit,
            Err(err) => {
                report(notify, err.into());
                return Ok(None);
            }
        };
        db.set_monthly_limit(limit)?;
        self.limit = limit;
        tracing::info!(limit = %limit.amount(), "monthly limit updated");
        notify.notify(Notice::success(format!(
            "Monthly limit set to {}",
            format_money(limit.amount(), 0)
        )));
        Ok(Some(self.limit_status()))
    }

    pub fn submit_entry(&mut self, notify: &mut impl Notify) -> Option<Request> {
        match self.entry.validate() {
            Ok(draft) => Some(Request::Create(draft)),
            Err(err) => {
                report(notify, err.into());
                None
            }
        }
    }

    pub fn open_edit(&mut self, id: ExpenseId) -> bool {
        self.edit.open_for(&self.cache, id)
    }

    pub fn close_edit(&mut self) {
        self.edit.close();
    }

    pub fn submit_edit(&mut self, notify: &mut impl Notify) -> Option<Request> {
        let EditSession::Open { id, form } = &self.edit else {
            return None;
        };
        match form.validate() {
            Ok(draft) => Some(Request::Update(*id, draft)),
            Err(err) => {
                report(notify, err.into());
                None
            }
        }
    }

    /// First half of a delete: returns the confirmation question, or `None`
    /// when the record is gone from the cache (reported as an error).
    pub fn request_delete(&mut self, id: ExpenseId, notify: &mut impl Notify) -> Option<String> {
        let Some(expense) = self.cache.find(id) else {
            self.pending_delete = None;
            report(notify, SessionError::StaleReference(id));
            return None;
        };
        let question = format!("Delete '{}' ({})?", expense.title, format_money(expense.amount, 2));
        self.pending_delete = Some(id);
        Some(question)
    }

    pub fn pending_delete(&self) -> Option<ExpenseId> {
        self.pending_delete
    }

    /// Second half of a delete. Declining is a no-op.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Option<Request> {
        let id = self.pending_delete.take()?;
        if confirmed {
            Some(Request::Delete(id))
        } else {
            tracing::debug!(expense_id = %id, "delete declined");
            None
        }
    }

    pub fn delete_with(&mut self, id: ExpenseId, prompt: &mut impl UserPrompt) -> Option<Request> {
        let question = self.request_delete(id, prompt)?;
        let confirmed = prompt.confirm(&question);
        self.confirm_delete(confirmed)
    }

    /// Folds a finished request into the session. Returns the follow-up
    /// request, which after any successful mutation is a full `List`.
    pub fn apply(&mut self, outcome: Outcome, notify: &mut impl Notify) -> Option<Request> {
        match outcome {
            Outcome::Listed(Ok(records)) => {
                tracing::debug!(count = records.len(), "cache replaced");
                self.cache.load(records);
                None
            }
            Outcome::Listed(Err(err)) => {
                let err = SessionError::Fetch(err);
                self.cache.invalidate(err.to_string());
                report(notify, err);
                None
            }
            Outcome::Created(Ok(message)) => {
                let message = if message.trim().is_empty() {
                    "Expense added.".to_string()
                } else {
                    message
                };
                tracing::info!("expense created");
                notify.notify(Notice::success(message));
                self.entry.clear();
                Some(Request::List)
            }
            Outcome::Created(Err(err)) => {
                report(notify, SessionError::Create(err));
                None
            }
            Outcome::Updated(id, Ok(())) => {
                if self.edit.target() == Some(id) {
                    self.edit.close();
                }
                tracing::info!(expense_id = %id, "expense updated");
                notify.notify(Notice::success(format!("Expense {id} updated")));
                Some(Request::List)
            }
            Outcome::Updated(id, Err(source)) => {
                report(notify, SessionError::Update { id, source });
                None
            }
            Outcome::Deleted(id, Ok(())) => {
                tracing::info!(expense_id = %id, "expense deleted");
                notify.notify(Notice::success(format!("Expense {id} deleted")));
                Some(Request::List)
            }
            Outcome::Deleted(id, Err(source)) => {
                report(notify, SessionError::Delete { id, source });
                None
            }
        }
    }
}

/// Runs `request` and every follow-up it triggers, one after another.
pub async fn drive(
    store: &dyn ExpenseStore,
    session: &mut Session,
    notify: &mut impl Notify,
    request: Request,
) {
    let mut next = Some(request);
    while let Some(request) = next.take() {
        let outcome = api::execute(store, request).await;
        next = session.apply(outcome, notify);
    }
}
