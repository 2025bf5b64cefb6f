//! Saving goal endpoints.

use mindful_ledger_core::forms::{DepositInput, SavingGoalInput};
use mindful_ledger_core::models::SavingGoal;
use mindful_ledger_core::types::SavingGoalId;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_saving_goals(&self) -> Result<Vec<SavingGoal>, ApiError> {
        self.get("/saving-goals").await
    }

    /// # Errors
    ///
    /// Returns error if the goal is not found or the request fails.
    #[instrument(skip(self), fields(goal_id = %id))]
    pub async fn get_saving_goal(&self, id: SavingGoalId) -> Result<SavingGoal, ApiError> {
        self.get(&format!("/saving-goals/{id}")).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_saving_goal(&self, input: &SavingGoalInput) -> Result<SavingGoal, ApiError> {
        self.post("/saving-goals", input).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input), fields(goal_id = %id))]
    pub async fn update_saving_goal(
        &self,
        id: SavingGoalId,
        input: &SavingGoalInput,
    ) -> Result<SavingGoal, ApiError> {
        self.patch(&format!("/saving-goals/{id}"), input).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(goal_id = %id))]
    pub async fn delete_saving_goal(&self, id: SavingGoalId) -> Result<(), ApiError> {
        self.delete(&format!("/saving-goals/{id}")).await
    }

    /// Add money to a goal. The server increments `currentAmount`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(goal_id = %id, amount = %deposit.amount))]
    pub async fn deposit_to_goal(
        &self,
        id: SavingGoalId,
        deposit: DepositInput,
    ) -> Result<SavingGoal, ApiError> {
        self.patch(&format!("/saving-goals/{id}/deposit"), &deposit)
            .await
    }
}
