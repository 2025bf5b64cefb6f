//! Authentication and account endpoints.

use mindful_ledger_core::forms::{Credentials, PasswordChange, ProfileUpdate, Registration};
use mindful_ledger_core::models::{LoginResponse, UserProfile};
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Exchange credentials for a token and the minimal user record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] with the server's message when the
    /// credentials are rejected.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.post("/auth/login", credentials).await
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the server rejects fields (e.g.
    /// the email is already registered).
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<UserProfile, ApiError> {
        self.post("/auth/register", registration).await
    }

    /// Fetch the full profile of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the token is not accepted.
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<UserProfile, ApiError> {
        self.get("/me").await
    }

    /// Update profile details. Returns the updated profile.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, update))]
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.patch("/me", update).await
    }

    /// Change the password.
    ///
    /// # Errors
    ///
    /// Returns error if the current password is wrong or the request fails.
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let _: serde_json::Value = self.patch("/me/password", change).await?;
        Ok(())
    }
}
