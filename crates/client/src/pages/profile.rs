//! Profile page: account details and password change.

use mindful_ledger_core::forms::{
    Form, PasswordField, PasswordForm, ProfileField, ProfileForm,
};
use mindful_ledger_core::models::UserProfile;
use tracing::{info, warn};

use super::{FormState, PageError, SAVE_FAILED};
use crate::session::Session;

/// Banner shown when the password change is refused.
pub const PASSWORD_REJECTED: &str = "Current password is incorrect";
pub const PROFILE_UPDATED: &str = "Profile updated.";
pub const PASSWORD_UPDATED: &str = "Password updated.";

#[derive(Debug)]
pub struct ProfilePage {
    pub profile: FormState<ProfileForm, ProfileField>,
    pub password: FormState<PasswordForm, PasswordField>,
    /// Success message for the last save.
    pub notice: Option<String>,
}

impl ProfilePage {
    /// Prefill the profile form from the session's profile.
    #[must_use]
    pub fn new(session: &Session) -> Self {
        let values = session.profile().map(ProfileForm::from).unwrap_or_default();
        Self {
            profile: FormState::new(values),
            password: FormState::new(PasswordForm::default()),
            notice: None,
        }
    }

    /// Save the profile, then refresh the session's copy.
    ///
    /// # Errors
    ///
    /// [`PageError::Invalid`] without any request when validation fails,
    /// [`PageError::Rejected`] for server field errors, otherwise
    /// [`PageError::Failed`].
    pub async fn submit_profile(
        &mut self,
        session: &mut Session,
    ) -> Result<UserProfile, PageError<ProfileField>> {
        self.notice = None;
        self.profile.banner = None;
        let update = match self.profile.values.validate() {
            Ok(update) => update,
            Err(errors) => return Err(self.profile.invalid(errors)),
        };

        self.profile.saving = true;
        let result = session.client().update_me(&update).await;
        self.profile.saving = false;

        let saved = match result {
            Ok(profile) => profile,
            Err(e) => return Err(self.profile.rejected(&e, SAVE_FAILED)),
        };
        info!(user_id = %saved.id, "Profile updated");

        if let Err(e) = session.refresh_profile().await {
            warn!(error = %e, "Failed to refresh profile after update");
        }
        let current = session.profile().unwrap_or(&saved);
        self.profile.reset(ProfileForm::from(current));
        self.notice = Some(PROFILE_UPDATED.to_string());
        Ok(saved)
    }

    /// Change the password. The form is cleared on success.
    ///
    /// # Errors
    ///
    /// [`PageError::Invalid`] without any request when validation fails;
    /// any refusal shows [`PASSWORD_REJECTED`].
    pub async fn submit_password(
        &mut self,
        session: &Session,
    ) -> Result<(), PageError<PasswordField>> {
        self.notice = None;
        self.password.banner = None;
        let change = match self.password.values.validate() {
            Ok(change) => change,
            Err(errors) => return Err(self.password.invalid(errors)),
        };

        self.password.saving = true;
        let result = session.client().change_password(&change).await;
        self.password.saving = false;

        match result {
            Ok(()) => {
                info!("Password changed");
                self.password.reset(PasswordForm::default());
                self.notice = Some(PASSWORD_UPDATED.to_string());
                Ok(())
            }
            Err(e) => Err(self.password.rejected(&e, PASSWORD_REJECTED)),
        }
    }
}
