//! Remote store client for the expense API.
//!
//! Every call is a single HTTP round trip. Any non-success status is a
//! failure no matter what the body says; callers turn failures into
//! notifications instead of propagating them.

mod rest;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::{Expense, ExpenseDraft, ExpenseId};

pub(crate) use rest::RestClient;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server responded with {0}")]
    Status(StatusCode),
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Expense>, ApiError>;
    async fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ApiError>;
    /// Returns the server's plain-text acknowledgment.
    async fn create(&self, draft: &ExpenseDraft) -> Result<String, ApiError>;
    async fn update(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<(), ApiError>;
    async fn delete(&self, id: ExpenseId) -> Result<(), ApiError>;
}

/// Network work requested by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    List,
    Create(ExpenseDraft),
    Update(ExpenseId, ExpenseDraft),
    Delete(ExpenseId),
}

impl Request {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::List)
    }
}

/// Completion of a `Request`, fed back into `Session::apply`.
#[derive(Debug)]
pub enum Outcome {
    Listed(Result<Vec<Expense>, ApiError>),
    Created(Result<String, ApiError>),
    Updated(ExpenseId, Result<(), ApiError>),
    Deleted(ExpenseId, Result<(), ApiError>),
}

pub async fn execute(store: &dyn ExpenseStore, request: Request) -> Outcome {
    match request {
        Request::List => Outcome::Listed(store.list().await),
        Request::Create(draft) => Outcome::Created(store.create(&draft).await),
        Request::Update(id, draft) => Outcome::Updated(id, store.update(id, &draft).await),
        Request::Delete(id) => Outcome::Deleted(id, store.delete(id).await),
    }
}

#[cfg(test)]
mod tests;
