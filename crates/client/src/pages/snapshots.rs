//! Daily snapshot page.
//!
//! There is at most one snapshot per day. The form edits today's snapshot
//! when the server reports one, and creates it otherwise.

use mindful_ledger_core::forms::{Form, SnapshotField, SnapshotForm};
use mindful_ledger_core::models::DailySnapshot;
use tracing::{info, warn};

use super::{FormState, LOAD_FAILED, PageError, SAVE_FAILED};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::Session;

#[derive(Debug)]
pub struct SnapshotsPage {
    client: ApiClient,
    pub snapshots: Vec<DailySnapshot>,
    pub today: Option<DailySnapshot>,
    pub form: FormState<SnapshotForm, SnapshotField>,
    pub open: bool,
    pub loading: bool,
    pub banner: Option<String>,
}

impl SnapshotsPage {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            client: session.client().clone(),
            snapshots: Vec::new(),
            today: None,
            form: FormState::new(SnapshotForm::default()),
            open: false,
            loading: false,
            banner: None,
        }
    }

    /// Fetch the history and today's snapshot together.
    ///
    /// # Errors
    ///
    /// Returns the first API error after setting the banner.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let result = tokio::try_join!(self.client.list_snapshots(), self.client.today_snapshot());
        self.loading = false;

        match result {
            Ok((snapshots, today)) => {
                self.snapshots = snapshots;
                self.today = today;
                self.banner = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load snapshots");
                self.banner = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Open the form, prefilled from today's snapshot if there is one.
    pub fn open_form(&mut self) {
        let values = self.today.as_ref().map(SnapshotForm::from).unwrap_or_default();
        self.form.reset(values);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// True when submitting will update rather than create.
    #[must_use]
    pub const fn has_today(&self) -> bool {
        self.today.is_some()
    }

    /// Validate, save today's snapshot and reload.
    ///
    /// # Errors
    ///
    /// [`PageError::Invalid`] without any request for a bad score,
    /// [`PageError::Rejected`] for server field errors, otherwise
    /// [`PageError::Failed`].
    pub async fn submit(&mut self) -> Result<DailySnapshot, PageError<SnapshotField>> {
        self.form.banner = None;
        let input = match self.form.values.validate() {
            Ok(input) => input,
            Err(errors) => return Err(self.form.invalid(errors)),
        };

        self.form.saving = true;
        let result = if self.has_today() {
            self.client.update_today_snapshot(&input).await
        } else {
            self.client.create_snapshot(&input).await
        };
        self.form.saving = false;

        match result {
            Ok(snapshot) => {
                info!(date = %snapshot.date, "Snapshot saved");
                self.open = false;
                if self.load().await.is_err() {
                    self.today = Some(snapshot.clone());
                }
                Ok(snapshot)
            }
            Err(e) => Err(self.form.rejected(&e, SAVE_FAILED)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use mindful_ledger_core::types::Mood;
    use serde_json::json;

    fn page() -> SnapshotsPage {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let client = ApiClient::with_base_url(
            url::Url::parse("http://127.0.0.1:9/api").unwrap(),
            Arc::clone(&store),
        )
        .unwrap();
        SnapshotsPage::new(&Session::new(client, store))
    }

    #[test]
    fn test_open_form_prefills_from_today() {
        let mut page = page();
        page.open_form();
        assert_eq!(page.form.values, SnapshotForm::default());

        page.today = Some(
            serde_json::from_value(json!({
                "id": uuid::Uuid::new_v4(),
                "date": "2026-03-02",
                "mood": "calm",
                "reflection": "Slow morning",
                "consciousScore": 7,
                "createdAt": "2026-03-02T08:00:00Z"
            }))
            .unwrap(),
        );
        page.open_form();
        assert!(page.open);
        assert_eq!(page.form.values.mood, Some(Mood::Calm));
        assert_eq!(page.form.values.conscious_score, "7");
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_not_sent() {
        let mut page = page();
        page.open_form();
        page.form.values.conscious_score = "11".into();

        let err = page.submit().await.unwrap_err();
        assert!(matches!(err, PageError::Invalid(_)));
        assert!(page.form.errors.contains(SnapshotField::ConsciousScore));
        assert!(page.form.banner.is_none());
    }
}
