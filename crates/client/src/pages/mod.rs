//! Page controllers.
//!
//! A page owns the state a view needs (the loaded list, the open form, its
//! field errors and a banner) and exposes the operations the view triggers.
//! Front-ends drive a page and render its state; they never call the API
//! directly.
//!
//! Every form page follows the same flow: `load`, `open_create` or
//! `open_edit`, `edit` fields, then `submit`, which validates locally first
//! and only then calls the API. After any mutation the list is reloaded.

mod auth;
mod crud;
mod dashboard;
mod goals;
mod habits;
mod profile;
mod snapshots;
mod transactions;

pub use auth::{INVALID_CREDENTIALS, LOGIN_FAILED, LoginPage, REGISTER_FAILED, RegisterPage};
pub use crud::{
    Categories, CrudPage, CrudResource, DeleteOutcome, FieldOf, Habits, InputOf, InvestmentProfiles,
    Modal, RowAction, SavingGoals, Transactions,
};
pub use dashboard::{DashboardPage, load_dashboard};
pub use goals::DEPOSIT_FAILED;
pub use profile::{PASSWORD_REJECTED, PASSWORD_UPDATED, PROFILE_UPDATED, ProfilePage};
pub use snapshots::SnapshotsPage;
pub use transactions::TransactionsPage;

use mindful_ledger_core::forms::{FieldErrors, FormField};
use thiserror::Error;

use crate::error::ApiError;

/// Banner shown when a create or update fails for a non-field reason.
pub const SAVE_FAILED: &str = "Could not save";
/// Banner shown when a delete fails.
pub const DELETE_FAILED: &str = "Could not delete";
/// Banner shown when a list cannot be loaded.
pub const LOAD_FAILED: &str = "Could not load data";

/// Why a page operation did not go through.
#[derive(Debug, Error)]
pub enum PageError<F: FormField> {
    /// Local validation failed; nothing was sent.
    #[error("Invalid input: {0}")]
    Invalid(FieldErrors<F>),

    /// The server rejected fields.
    #[error("Rejected by server: {0}")]
    Rejected(FieldErrors<F>),

    /// Any other failure; the string is the banner text.
    #[error("{0}")]
    Failed(String),
}

impl<F: FormField> PageError<F> {
    /// Field errors, if this failure has any.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors<F>> {
        match self {
            Self::Invalid(errors) | Self::Rejected(errors) => Some(errors),
            Self::Failed(_) => None,
        }
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Form state shared by every page: the values, their errors and a banner.
#[derive(Debug, Clone)]
pub struct FormState<T, F: FormField> {
    pub values: T,
    pub errors: FieldErrors<F>,
    pub banner: Option<String>,
    pub saving: bool,
}

impl<T, F: FormField> FormState<T, F> {
    #[must_use]
    pub fn new(values: T) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
            banner: None,
            saving: false,
        }
    }

    /// Change one field, clearing its error.
    pub fn edit(&mut self, field: F, apply: impl FnOnce(&mut T)) {
        apply(&mut self.values);
        self.errors.clear(field);
    }

    /// Replace the values and forget any errors.
    pub fn reset(&mut self, values: T) {
        self.values = values;
        self.errors.clear_all();
        self.banner = None;
        self.saving = false;
    }

    /// Record a local validation failure.
    pub fn invalid(&mut self, errors: FieldErrors<F>) -> PageError<F> {
        self.errors = errors.clone();
        PageError::Invalid(errors)
    }

    /// Record a failed API call.
    ///
    /// Field errors from the server land on the matching fields; anything
    /// else becomes `fallback` in the banner.
    pub fn rejected(&mut self, error: &ApiError, fallback: &str) -> PageError<F> {
        self.banner = None;
        if let ApiError::Validation { errors, .. } = error {
            let (mapped, unmatched) = FieldErrors::from_server(errors);
            self.banner = (!unmatched.is_empty()).then(|| unmatched.join("; "));
            if !mapped.is_empty() {
                self.errors = mapped.clone();
                return PageError::Rejected(mapped);
            }
        }
        tracing::warn!(error = %error, "{}", fallback);
        let banner = self.banner.take().unwrap_or_else(|| fallback.to_string());
        self.banner = Some(banner.clone());
        PageError::Failed(banner)
    }
}
