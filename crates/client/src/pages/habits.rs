//! Habits page: CRUD plus archive/restore, logging and history.

use mindful_ledger_core::forms::{HabitForm, HabitPatch};
use mindful_ledger_core::models::{Habit, HabitLog};
use mindful_ledger_core::types::HabitId;
use tracing::{info, warn};

use super::crud::{CrudPage, CrudResource, InputOf, RowAction};
use super::SAVE_FAILED;
use crate::api::ApiClient;
use crate::error::ApiError;

#[derive(Debug)]
pub enum Habits {}

impl CrudResource for Habits {
    type Item = Habit;
    type Id = HabitId;
    type Form = HabitForm;
    type Query = ();

    const NOUN: &'static str = "habit";

    fn id(item: &Habit) -> HabitId {
        item.id
    }

    fn actions(item: &Habit) -> Vec<RowAction> {
        if item.active {
            vec![
                RowAction::LogToday,
                RowAction::Edit,
                RowAction::Archive,
                RowAction::Delete,
            ]
        } else {
            vec![RowAction::Restore, RowAction::Delete]
        }
    }

    async fn list(client: &ApiClient, _: &()) -> Result<Vec<Habit>, ApiError> {
        client.list_habits(None).await
    }

    async fn create(client: &ApiClient, input: &InputOf<Self>) -> Result<Habit, ApiError> {
        client.create_habit(input).await
    }

    async fn update(
        client: &ApiClient,
        id: HabitId,
        input: &InputOf<Self>,
    ) -> Result<Habit, ApiError> {
        client.update_habit(id, &HabitPatch::from(input.clone())).await
    }

    async fn delete(client: &ApiClient, id: HabitId) -> Result<(), ApiError> {
        client.delete_habit(id).await
    }
}

impl CrudPage<Habits> {
    /// Habits still being tracked.
    pub fn active(&self) -> impl Iterator<Item = &Habit> {
        self.items.iter().filter(|h| h.active)
    }

    /// Archived habits.
    pub fn archived(&self) -> impl Iterator<Item = &Habit> {
        self.items.iter().filter(|h| !h.active)
    }

    /// Archive an active habit or restore an archived one, then reload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the habit is not listed, or the API
    /// error.
    pub async fn toggle_active(&mut self, id: HabitId) -> Result<Habit, ApiError> {
        let active = self
            .item(id)
            .map(|h| h.active)
            .ok_or_else(|| ApiError::NotFound(format!("habit {id}")))?;

        let result = self
            .client()
            .update_habit(id, &HabitPatch::active(!active))
            .await;
        let habit = self.after_row_action(result, "Failed to update habit")?;
        info!(habit_id = %id, active = habit.active, "Habit toggled");
        self.reload().await;
        Ok(habit)
    }

    /// Mark the habit done for today.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn log_today(&mut self, id: HabitId) -> Result<HabitLog, ApiError> {
        let result = self.client().log_habit(id, true, None).await;
        let log = self.after_row_action(result, "Failed to log habit")?;
        info!(habit_id = %id, date = %log.date, "Habit logged");
        self.reload().await;
        Ok(log)
    }

    /// Completion history of one habit.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn history(&self, id: HabitId) -> Result<Vec<HabitLog>, ApiError> {
        self.client().list_habit_logs(id).await
    }

    fn after_row_action<T>(
        &mut self,
        result: Result<T, ApiError>,
        context: &str,
    ) -> Result<T, ApiError> {
        result.map_err(|e| {
            warn!(error = %e, "{}", context);
            self.banner = Some(SAVE_FAILED.to_string());
            e
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn habit(active: bool) -> Habit {
        serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "name": "Walk",
            "frequency": "daily",
            "active": active,
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_actions_depend_on_active_flag() {
        assert!(Habits::actions(&habit(true)).contains(&RowAction::LogToday));
        assert!(Habits::actions(&habit(true)).contains(&RowAction::Archive));
        assert_eq!(
            Habits::actions(&habit(false)),
            [RowAction::Restore, RowAction::Delete]
        );
    }
}
