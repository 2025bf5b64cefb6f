//! Habit and habit log endpoints.

use chrono::NaiveDate;
use mindful_ledger_core::forms::{HabitInput, HabitPatch};
use mindful_ledger_core::models::{Habit, HabitLog};
use mindful_ledger_core::types::HabitId;
use serde::Serialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct LogHabitBody {
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl ApiClient {
    /// List habits; `active` narrows to active or archived ones.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_habits(&self, active: Option<bool>) -> Result<Vec<Habit>, ApiError> {
        let query: Vec<_> = active.map(|a| ("active", a.to_string())).into_iter().collect();
        self.get_with_query("/habits", &query).await
    }

    /// # Errors
    ///
    /// Returns error if the habit is not found or the request fails.
    #[instrument(skip(self), fields(habit_id = %id))]
    pub async fn get_habit(&self, id: HabitId) -> Result<Habit, ApiError> {
        self.get(&format!("/habits/{id}")).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_habit(&self, input: &HabitInput) -> Result<Habit, ApiError> {
        self.post("/habits", input).await
    }

    /// Change name, frequency or the active flag.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, patch), fields(habit_id = %id))]
    pub async fn update_habit(&self, id: HabitId, patch: &HabitPatch) -> Result<Habit, ApiError> {
        self.patch(&format!("/habits/{id}"), patch).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(habit_id = %id))]
    pub async fn delete_habit(&self, id: HabitId) -> Result<(), ApiError> {
        self.delete(&format!("/habits/{id}")).await
    }

    /// Completion history of a habit.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(habit_id = %id))]
    pub async fn list_habit_logs(&self, id: HabitId) -> Result<Vec<HabitLog>, ApiError> {
        self.get(&format!("/habits/{id}/logs")).await
    }

    /// Record a completion (or a miss). Without `date` the server uses today.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(habit_id = %id))]
    pub async fn log_habit(
        &self,
        id: HabitId,
        completed: bool,
        date: Option<NaiveDate>,
    ) -> Result<HabitLog, ApiError> {
        self.post(
            &format!("/habits/{id}/logs"),
            &LogHabitBody { completed, date },
        )
        .await
    }
}
