use async_trait::async_trait;
use std::time::Duration;

use super::{ApiError, ExpenseStore};
use crate::config::Config;
use crate::models::{Expense, ExpenseDraft, ExpenseId};

#[derive(Clone)]
pub(crate) struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub(crate) fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn item_url(&self, id: ExpenseId) -> String {
        format!("{}/{id}", self.base_url)
    }
}

fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(%status, url = %response.url(), "expense API returned failure status");
        Err(ApiError::Status(status))
    }
}

/// Decodes each record on its own, so one malformed row (a `null` date, a
/// non-numeric amount) is dropped with a warning instead of failing the list.
pub(super) fn decode_records(values: Vec<serde_json::Value>) -> Vec<Expense> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Expense>(value) {
            Ok(expense) => Some(expense),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed expense record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ExpenseStore for RestClient {
    async fn list(&self) -> Result<Vec<Expense>, ApiError> {
        tracing::debug!(url = %self.base_url, "GET expenses");
        let response = check(self.client.get(&self.base_url).send().await?)?;
        let values: Vec<serde_json::Value> = response.json().await?;
        let expenses = decode_records(values);
        tracing::debug!(count = expenses.len(), "fetched expenses");
        Ok(expenses)
    }

    async fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ApiError> {
        tracing::debug!(expense_id = %id, "GET expense");
        let response = check(self.client.get(self.item_url(id)).send().await?)?;
        // A missing record comes back as 200 with an empty or `null` body.
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice::<Option<Expense>>(&body)?)
    }

    async fn create(&self, draft: &ExpenseDraft) -> Result<String, ApiError> {
        tracing::debug!(title = %draft.title, amount = %draft.amount, "POST expense");
        let response = check(self.client.post(&self.base_url).json(draft).send().await?)?;
        Ok(response.text().await?)
    }

    async fn update(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<(), ApiError> {
        tracing::debug!(expense_id = %id, "PUT expense");
        check(self.client.put(self.item_url(id)).json(draft).send().await?)?;
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), ApiError> {
        tracing::debug!(expense_id = %id, "DELETE expense");
        check(self.client.delete(self.item_url(id)).send().await?)?;
        Ok(())
    }
}
