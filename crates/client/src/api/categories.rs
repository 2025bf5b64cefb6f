//! Category endpoints.

use mindful_ledger_core::forms::CategoryInput;
use mindful_ledger_core::models::Category;
use mindful_ledger_core::types::CategoryId;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List all categories, system ones included.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories").await
    }

    /// # Errors
    ///
    /// Returns error if the category is not found or the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.get(&format!("/categories/{id}")).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.post("/categories", input).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        self.patch(&format!("/categories/{id}"), input).await
    }

    /// Delete a user category. The server refuses system categories.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.delete(&format!("/categories/{id}")).await
    }
}
