//! Subcommand implementations.
//!
//! Every command builds the page it needs from the bootstrapped session,
//! copies its arguments into the page's form and submits it, so the CLI gets
//! exactly the validation and error mapping any other front-end gets.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod goals;
pub mod habits;
pub mod investments;
pub mod profile;
pub mod snapshots;
pub mod transactions;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use mindful_ledger_client::guard::{self, Navigation, Route};
use mindful_ledger_client::pages::{Confirm, CrudPage, CrudResource, DeleteOutcome, PageError};
use mindful_ledger_client::{
    ApiClient, ApiError, ClientConfig, ConfigError, FileStore, KeyValueStore, Session,
    SessionError,
};
use mindful_ledger_core::forms::FormField;
use thiserror::Error;
use tracing::debug;

pub use auth::AuthAction;
pub use categories::CategoryAction;
pub use goals::GoalAction;
pub use habits::HabitAction;
pub use investments::InvestmentAction;
pub use profile::ProfileAction;
pub use snapshots::SnapshotAction;
pub use transactions::TransactionAction;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("{}", .0.user_message())]
    Session(#[from] SessionError),

    /// Field errors or a banner from a page.
    #[error("{0}")]
    Page(String),

    #[error("Not logged in. Run `mledger login` first")]
    NotLoggedIn,

    #[error("{0} requires an admin account")]
    Forbidden(&'static str),

    #[error("No {noun} with id {id}")]
    NotFound { noun: &'static str, id: String },

    #[error("This {0} cannot be deleted")]
    NotDeletable(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl<F: FormField> From<PageError<F>> for CliError {
    fn from(error: PageError<F>) -> Self {
        Self::Page(error.to_string())
    }
}

/// What every command runs with.
pub struct Context {
    pub session: Session,
    assume_yes: bool,
}

impl Context {
    /// Load configuration, open the session store and restore the session.
    pub async fn start(assume_yes: bool) -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        debug!(api_url = %config.api_url, state_dir = %config.state_dir.display(), "Starting");

        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.state_dir));
        let client = ApiClient::new(&config, Arc::clone(&store))?;
        let mut session = Session::new(client, store);
        session.bootstrap().await;

        Ok(Self {
            session,
            assume_yes,
        })
    }

    /// Check the route guards before running a command.
    pub fn enter(&self, route: Route) -> Result<(), CliError> {
        match guard::navigate(&self.session, route) {
            Navigation::Render => Ok(()),
            Navigation::Loading | Navigation::Redirect(Route::Login) => Err(CliError::NotLoggedIn),
            Navigation::Redirect(_) => Err(CliError::Forbidden(route.path())),
        }
    }

    pub const fn prompt(&self) -> Prompt {
        Prompt {
            assume_yes: self.assume_yes,
        }
    }
}

/// Yes/no question on the terminal; `--yes` skips it.
pub struct Prompt {
    assume_yes: bool,
}

impl Confirm for Prompt {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = io::stderr();
        if write!(stderr, "{prompt} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Open the create form, fill it and submit.
pub async fn create<R: CrudResource>(
    page: &mut CrudPage<R>,
    fill: impl FnOnce(&mut R::Form),
) -> Result<R::Item, CliError> {
    page.open_create();
    fill(&mut page.form.values);
    Ok(page.submit().await?)
}

/// Load, open the edit form for `id`, apply changes and submit.
pub async fn update<R: CrudResource>(
    page: &mut CrudPage<R>,
    id: R::Id,
    fill: impl FnOnce(&mut R::Form),
) -> Result<R::Item, CliError> {
    page.load().await?;
    if !page.open_edit(id) {
        return Err(not_found::<R>(id));
    }
    fill(&mut page.form.values);
    Ok(page.submit().await?)
}

/// Load, ask and delete.
pub async fn delete<R: CrudResource>(
    page: &mut CrudPage<R>,
    id: R::Id,
    prompt: &Prompt,
) -> Result<(), CliError> {
    page.load().await?;
    if page.item(id).is_none() {
        return Err(not_found::<R>(id));
    }
    match page.delete(id, prompt).await? {
        DeleteOutcome::Deleted => crate::render::done(&format!("Deleted {}.", R::NOUN)),
        DeleteOutcome::Declined => crate::render::done("Cancelled."),
        DeleteOutcome::NotOffered => return Err(CliError::NotDeletable(R::NOUN)),
    }
    Ok(())
}

pub fn not_found<R: CrudResource>(id: R::Id) -> CliError {
    CliError::NotFound {
        noun: R::NOUN,
        id: id.to_string(),
    }
}

/// Overwrite `target` when a flag was given.
pub fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
