//! Daily snapshot endpoints.

use mindful_ledger_core::forms::SnapshotInput;
use mindful_ledger_core::models::DailySnapshot;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// All snapshots, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_snapshots(&self) -> Result<Vec<DailySnapshot>, ApiError> {
        self.get("/snapshots").await
    }

    /// Today's snapshot, or `None` if it has not been written yet.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn today_snapshot(&self) -> Result<Option<DailySnapshot>, ApiError> {
        self.get("/snapshots/today").await
    }

    /// Create today's snapshot. The server allows one per day.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails, including when today's
    /// snapshot already exists.
    #[instrument(skip(self, input))]
    pub async fn create_snapshot(&self, input: &SnapshotInput) -> Result<DailySnapshot, ApiError> {
        self.post("/snapshots", input).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn update_today_snapshot(
        &self,
        input: &SnapshotInput,
    ) -> Result<DailySnapshot, ApiError> {
        self.patch("/snapshots/today", input).await
    }
}
