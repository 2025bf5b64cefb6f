//! Dashboard page.

use mindful_ledger_core::dashboard::{DashboardSummary, summarize};
use tracing::{debug, instrument, warn};

use super::LOAD_FAILED;
use crate::api::{ApiClient, TransactionFilters};
use crate::error::ApiError;
use crate::session::Session;

/// Fetch everything the dashboard shows, concurrently, and derive the
/// figures.
///
/// # Errors
///
/// Returns the first API error.
#[instrument(skip(client))]
pub async fn load_dashboard(client: &ApiClient) -> Result<DashboardSummary, ApiError> {
    let filters = TransactionFilters::default();
    let (transactions, goals, habits, today) = tokio::try_join!(
        client.list_transactions(&filters),
        client.list_saving_goals(),
        client.list_habits(Some(true)),
        client.today_snapshot(),
    )?;
    debug!(
        transactions = transactions.len(),
        goals = goals.len(),
        habits = habits.len(),
        "Dashboard data loaded"
    );
    Ok(summarize(&transactions, &goals, &habits, today))
}

#[derive(Debug)]
pub struct DashboardPage {
    client: ApiClient,
    pub summary: Option<DashboardSummary>,
    pub loading: bool,
    pub banner: Option<String>,
}

impl DashboardPage {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            client: session.client().clone(),
            summary: None,
            loading: false,
            banner: None,
        }
    }

    /// Refresh the summary. The previous one is kept on failure.
    ///
    /// # Errors
    ///
    /// Returns the API error after setting the banner.
    pub async fn load(&mut self) -> Result<&DashboardSummary, ApiError> {
        self.loading = true;
        let result = load_dashboard(&self.client).await;
        self.loading = false;

        match result {
            Ok(summary) => {
                self.banner = None;
                Ok(&*self.summary.insert(summary))
            }
            Err(e) => {
                warn!(error = %e, "Failed to load dashboard");
                self.banner = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }
}
