//! Transaction endpoints.

use chrono::NaiveDate;
use mindful_ledger_core::forms::TransactionInput;
use mindful_ledger_core::models::Transaction;
use mindful_ledger_core::types::{CategoryId, EmotionTag, TransactionId, TransactionType};
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

/// Optional filters for [`ApiClient::list_transactions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilters {
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub emotion_tag: Option<EmotionTag>,
    /// Inclusive lower bound on `occurredAt`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `occurredAt`.
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilters {
    /// Query parameters for the set filters, in a stable order.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(kind) = self.kind {
            query.push(("type", kind.to_string()));
        }
        if let Some(id) = self.category_id {
            query.push(("categoryId", id.to_string()));
        }
        if let Some(tag) = self.emotion_tag {
            query.push(("emotionTag", tag.to_string()));
        }
        if let Some(date) = self.start_date {
            query.push(("startDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            query.push(("endDate", date.format("%Y-%m-%d").to_string()));
        }
        query
    }
}

impl ApiClient {
    /// List transactions, newest first, narrowed by `filters`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_transactions(
        &self,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.get_with_query("/transactions", &filters.to_query()).await
    }

    /// # Errors
    ///
    /// Returns error if the transaction is not found or the request fails.
    #[instrument(skip(self), fields(transaction_id = %id))]
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, ApiError> {
        self.get(&format!("/transactions/{id}")).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_transaction(
        &self,
        input: &TransactionInput,
    ) -> Result<Transaction, ApiError> {
        self.post("/transactions", input).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input), fields(transaction_id = %id))]
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        input: &TransactionInput,
    ) -> Result<Transaction, ApiError> {
        self.patch(&format!("/transactions/{id}"), input).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(transaction_id = %id))]
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), ApiError> {
        self.delete(&format!("/transactions/{id}")).await
    }
}
