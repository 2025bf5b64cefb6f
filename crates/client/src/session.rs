//! The authenticated session.
//!
//! A [`Session`] is constructed once at startup, bootstrapped from durable
//! storage, and then passed to every page. It owns the in-memory user and
//! profile; the token itself only lives in storage, where the API client
//! reads it on every request.
//!
//! ```text
//! Unknown --bootstrap--> Restoring --profile ok--> Authenticated
//!    |                       \--profile failed--> Anonymous (storage cleared)
//!    \--no stored token--> Anonymous --login--> Authenticated --logout--> Anonymous
//! ```

use std::sync::Arc;

use mindful_ledger_core::forms::Credentials;
use mindful_ledger_core::models::{AuthUser, UserProfile};
use mindful_ledger_core::types::Role;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::storage::{KeyValueStore, StorageError, StorageKey};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, `bootstrap` not yet run.
    Unknown,
    /// A stored session is being checked against the API.
    Restoring,
    Authenticated,
    Anonymous,
}

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode user record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Not logged in")]
    NotAuthenticated,
}

impl SessionError {
    /// Text suitable for a banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Current user, profile and lifecycle state.
pub struct Session {
    client: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    state: SessionState,
    user: Option<AuthUser>,
    profile: Option<UserProfile>,
}

impl Session {
    /// Create an unbootstrapped session.
    ///
    /// `storage` must be the store the client reads its token from.
    #[must_use]
    pub fn new(client: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            storage,
            state: SessionState::Unknown,
            user: None,
            profile: None,
        }
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// The full profile; `None` until a fetch has succeeded.
    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True until `bootstrap` has settled.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Unknown | SessionState::Restoring)
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == role)
    }

    /// Restore a stored session, if any.
    ///
    /// With both a token and a readable user record in storage, the user is
    /// restored optimistically and the profile fetched. If that fetch fails
    /// the stored session is cleared and the session becomes anonymous.
    /// Never fails; problems are logged.
    #[instrument(skip(self))]
    pub async fn bootstrap(&mut self) -> SessionState {
        self.state = SessionState::Restoring;

        let Some(user) = self.stored_user() else {
            debug!("No stored session");
            self.state = SessionState::Anonymous;
            return self.state;
        };

        self.user = Some(user);
        match self.client.get_me().await {
            Ok(profile) => {
                info!(user_id = %profile.id, "Session restored");
                self.profile = Some(profile);
                self.state = SessionState::Authenticated;
            }
            Err(e) => {
                warn!(error = %e, "Stored session rejected, logging out");
                self.clear();
            }
        }
        self.state
    }

    /// Read the stored token and user record. Anything missing or malformed
    /// counts as no session.
    fn stored_user(&self) -> Option<AuthUser> {
        let read = |key: StorageKey| {
            self.storage.get(key).unwrap_or_else(|e| {
                warn!(error = %e, key = key.as_str(), "Failed to read stored session");
                None
            })
        };

        read(StorageKey::Token).filter(|t| !t.trim().is_empty())?;
        let raw = read(StorageKey::User)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed stored user record");
                None
            }
        }
    }

    /// Log in and load the profile.
    ///
    /// Rejected credentials leave the session anonymous with nothing
    /// stored. Once the token is accepted the session is authenticated even
    /// if the follow-up profile fetch fails; that failure is still returned.
    ///
    /// # Errors
    ///
    /// Returns the API error for rejected credentials or a failed profile
    /// fetch, or a storage error if the token cannot be persisted.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        let response = self.client.login(credentials).await?;

        let user_json = serde_json::to_string(&response.user)?;
        self.storage.set(StorageKey::Token, &response.token)?;
        if let Err(e) = self.storage.set(StorageKey::User, &user_json) {
            // Never leave a token without its user record.
            if let Err(rollback) = self.storage.remove(StorageKey::Token) {
                warn!(error = %rollback, "Failed to remove token after user record write failed");
            }
            return Err(e.into());
        }

        info!(user_id = %response.user.id, "Logged in");
        self.user = Some(response.user);
        self.profile = None;
        self.state = SessionState::Authenticated;

        self.profile = Some(self.client.get_me().await?);
        Ok(())
    }

    /// Forget the session, in memory and in storage. Cannot fail.
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            info!(user_id = %user.id, "Logged out");
        }
        self.clear();
    }

    fn clear(&mut self) {
        for key in StorageKey::ALL {
            if let Err(e) = self.storage.remove(key) {
                warn!(error = %e, key = key.as_str(), "Failed to clear stored session");
            }
        }
        self.user = None;
        self.profile = None;
        self.state = SessionState::Anonymous;
    }

    /// Re-fetch the profile after an edit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAuthenticated`] when logged out, or the API
    /// error. The previous profile is kept on failure.
    #[instrument(skip(self))]
    pub async fn refresh_profile(&mut self) -> Result<(), SessionError> {
        if self.user.is_none() {
            return Err(SessionError::NotAuthenticated);
        }
        self.profile = Some(self.client.get_me().await?);
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("user", &self.user.as_ref().map(|u| u.email.as_str()))
            .field("has_profile", &self.profile.is_some())
            .finish_non_exhaustive()
    }
}
