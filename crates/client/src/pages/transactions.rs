//! Transactions page: a CRUD list plus the categories the form picks from.

use chrono::Utc;
use mindful_ledger_core::forms::TransactionForm;
use mindful_ledger_core::models::{Category, Transaction};
use mindful_ledger_core::types::{TransactionId, TransactionType};
use tracing::warn;

use super::crud::{CrudPage, CrudResource, InputOf};
use super::LOAD_FAILED;
use crate::api::{ApiClient, TransactionFilters};
use crate::error::ApiError;
use crate::session::Session;

#[derive(Debug)]
pub enum Transactions {}

impl CrudResource for Transactions {
    type Item = Transaction;
    type Id = TransactionId;
    type Form = TransactionForm;
    type Query = TransactionFilters;

    const NOUN: &'static str = "transaction";

    fn id(item: &Transaction) -> TransactionId {
        item.id
    }

    async fn list(
        client: &ApiClient,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, ApiError> {
        client.list_transactions(filters).await
    }

    async fn create(client: &ApiClient, input: &InputOf<Self>) -> Result<Transaction, ApiError> {
        client.create_transaction(input).await
    }

    async fn update(
        client: &ApiClient,
        id: TransactionId,
        input: &InputOf<Self>,
    ) -> Result<Transaction, ApiError> {
        client.update_transaction(id, input).await
    }

    async fn delete(client: &ApiClient, id: TransactionId) -> Result<(), ApiError> {
        client.delete_transaction(id).await
    }
}

/// Transactions list with the category picker's options.
#[derive(Debug)]
pub struct TransactionsPage {
    pub crud: CrudPage<Transactions>,
    pub categories: Vec<Category>,
}

impl TransactionsPage {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            crud: CrudPage::new(session),
            categories: Vec::new(),
        }
    }

    /// Fetch transactions and categories together. Both must succeed.
    ///
    /// # Errors
    ///
    /// Returns the first API error; the previous lists are kept.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.crud.loading = true;
        let client = self.crud.client().clone();
        let result = tokio::try_join!(
            client.list_transactions(&self.crud.query),
            client.list_categories(),
        );
        self.crud.loading = false;

        match result {
            Ok((transactions, categories)) => {
                self.categories = categories;
                self.crud.set_items(Ok(transactions))
            }
            Err(e) => {
                warn!(error = %e, "Failed to load transactions page");
                self.crud.banner = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Replace the filters and reload.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn filter(&mut self, filters: TransactionFilters) -> Result<(), ApiError> {
        self.crud.query = filters;
        self.crud.load().await
    }

    /// Open an empty form dated now.
    pub fn open_create(&mut self) {
        self.crud.open_create();
        self.crud.form.values = TransactionForm::starting_at(Utc::now());
    }

    /// Categories matching the form's current type, for the picker.
    #[must_use]
    pub fn category_choices(&self) -> Vec<&Category> {
        self.choices_for(self.crud.form.values.kind)
    }

    #[must_use]
    pub fn choices_for(&self, kind: TransactionType) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.kind == kind).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pages::Modal;
    use crate::storage::{KeyValueStore, MemoryStore};
    use serde_json::json;

    fn page() -> TransactionsPage {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let client = ApiClient::with_base_url(
            url::Url::parse("http://127.0.0.1:9/api").unwrap(),
            Arc::clone(&store),
        )
        .unwrap();
        TransactionsPage::new(&Session::new(client, store))
    }

    fn category(name: &str, kind: &str) -> Category {
        serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "name": name,
            "icon": null,
            "type": kind,
            "isSystem": false
        }))
        .unwrap()
    }

    #[test]
    fn test_choices_follow_form_type() {
        let mut page = page();
        page.categories = vec![category("Salary", "income"), category("Food", "expense")];

        page.open_create();
        assert_eq!(page.crud.modal, Modal::Create);
        assert!(!page.crud.form.values.occurred_at.is_empty());
        let names: Vec<_> = page.category_choices().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Food"]);

        page.crud.form.values.kind = TransactionType::Income;
        let names: Vec<_> = page.category_choices().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Salary"]);
    }

    #[tokio::test]
    async fn test_failed_load_sets_banner() {
        let mut page = page();
        assert!(page.load().await.is_err());
        assert_eq!(page.crud.banner.as_deref(), Some(LOAD_FAILED));
        assert!(!page.crud.loading);
    }
}
