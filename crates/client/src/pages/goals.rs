//! Saving goals page: CRUD plus deposits.

use mindful_ledger_core::forms::{DepositField, DepositForm, Form, SavingGoalForm};
use mindful_ledger_core::models::SavingGoal;
use mindful_ledger_core::types::SavingGoalId;
use tracing::{info, warn};

use super::crud::{CrudPage, CrudResource, InputOf, RowAction};
use super::{FormState, PageError};
use crate::api::ApiClient;
use crate::error::ApiError;

/// Banner shown when a deposit call fails.
pub const DEPOSIT_FAILED: &str = "Could not deposit";

#[derive(Debug)]
pub enum SavingGoals {}

impl CrudResource for SavingGoals {
    type Item = SavingGoal;
    type Id = SavingGoalId;
    type Form = SavingGoalForm;
    type Query = ();

    const NOUN: &'static str = "saving goal";

    fn id(item: &SavingGoal) -> SavingGoalId {
        item.id
    }

    fn actions(_item: &SavingGoal) -> Vec<RowAction> {
        vec![RowAction::Deposit, RowAction::Edit, RowAction::Delete]
    }

    async fn list(client: &ApiClient, _: &()) -> Result<Vec<SavingGoal>, ApiError> {
        client.list_saving_goals().await
    }

    async fn create(client: &ApiClient, input: &InputOf<Self>) -> Result<SavingGoal, ApiError> {
        client.create_saving_goal(input).await
    }

    async fn update(
        client: &ApiClient,
        id: SavingGoalId,
        input: &InputOf<Self>,
    ) -> Result<SavingGoal, ApiError> {
        client.update_saving_goal(id, input).await
    }

    async fn delete(client: &ApiClient, id: SavingGoalId) -> Result<(), ApiError> {
        client.delete_saving_goal(id).await
    }
}

impl CrudPage<SavingGoals> {
    /// Add money to a goal and reload.
    ///
    /// The amount is validated first; nothing is sent when it is not
    /// positive.
    ///
    /// # Errors
    ///
    /// [`PageError::Invalid`] for a bad amount, [`PageError::Rejected`]
    /// when the server flags the amount, otherwise [`PageError::Failed`]
    /// with the banner text.
    pub async fn deposit(
        &mut self,
        id: SavingGoalId,
        form: &DepositForm,
    ) -> Result<SavingGoal, PageError<DepositField>> {
        self.banner = None;
        let input = form.validate().map_err(PageError::Invalid)?;

        match self.client().deposit_to_goal(id, input).await {
            Ok(goal) => {
                info!(goal_id = %id, amount = %input.amount, "Deposited");
                self.reload().await;
                Ok(goal)
            }
            Err(e) => {
                warn!(error = %e, goal_id = %id, "Deposit failed");
                let mut state: FormState<DepositForm, DepositField> = FormState::new(form.clone());
                let err = state.rejected(&e, DEPOSIT_FAILED);
                self.banner = state.banner;
                Err(err)
            }
        }
    }
}
