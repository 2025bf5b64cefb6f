//! Login and registration pages.

use mindful_ledger_core::forms::{Form, LoginField, LoginForm, RegisterField, RegisterForm};
use tracing::{info, warn};

use super::{FormState, PageError};
use crate::error::{ApiError, UNAUTHORIZED_MESSAGE};
use crate::session::{Session, SessionError};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const LOGIN_FAILED: &str = "Could not log in";
pub const REGISTER_FAILED: &str = "Could not register";

/// Banner text for a failed call: the server's message when it sent one.
fn server_message(error: &ApiError, fallback: &str) -> String {
    match error {
        ApiError::Unauthorized(message) if message == UNAUTHORIZED_MESSAGE => {
            INVALID_CREDENTIALS.to_string()
        }
        ApiError::Unauthorized(message) | ApiError::Api { message, .. } => message.clone(),
        _ => fallback.to_string(),
    }
}

#[derive(Debug)]
pub struct LoginPage {
    pub form: FormState<LoginForm, LoginField>,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: FormState::new(LoginForm::default()),
        }
    }

    /// Validate and log in.
    ///
    /// # Errors
    ///
    /// [`PageError::Invalid`] without any request when validation fails,
    /// [`PageError::Rejected`] for server field errors, otherwise
    /// [`PageError::Failed`] with the server's message.
    pub async fn submit(&mut self, session: &mut Session) -> Result<(), PageError<LoginField>> {
        self.form.banner = None;
        let credentials = match self.form.values.validate() {
            Ok(credentials) => credentials,
            Err(errors) => return Err(self.form.invalid(errors)),
        };

        self.form.saving = true;
        let result = session.login(&credentials).await;
        self.form.saving = false;

        match result {
            Ok(()) => {
                self.form.reset(LoginForm::default());
                Ok(())
            }
            Err(SessionError::Api(e)) => {
                let fallback = server_message(&e, LOGIN_FAILED);
                Err(self.form.rejected(&e, &fallback))
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                let banner = e.user_message();
                self.form.banner = Some(banner.clone());
                Err(PageError::Failed(banner))
            }
        }
    }
}

#[derive(Debug)]
pub struct RegisterPage {
    pub form: FormState<RegisterForm, RegisterField>,
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: FormState::new(RegisterForm::default()),
        }
    }

    /// Validate, create the account, then log in with the same credentials.
    ///
    /// # Errors
    ///
    /// [`PageError::Invalid`] without any request when validation fails,
    /// [`PageError::Rejected`] for server field errors, otherwise
    /// [`PageError::Failed`] with the server's message.
    pub async fn submit(&mut self, session: &mut Session) -> Result<(), PageError<RegisterField>> {
        self.form.banner = None;
        let registration = match self.form.values.validate() {
            Ok(registration) => registration,
            Err(errors) => return Err(self.form.invalid(errors)),
        };

        self.form.saving = true;
        let registered = session.client().register(&registration).await;
        let result = match registered {
            Ok(profile) => {
                info!(user_id = %profile.id, "Registered");
                session.login(&registration.credentials()).await
            }
            Err(e) => Err(SessionError::Api(e)),
        };
        self.form.saving = false;

        match result {
            Ok(()) => {
                self.form.reset(RegisterForm::default());
                Ok(())
            }
            Err(SessionError::Api(e)) => {
                let fallback = server_message(&e, REGISTER_FAILED);
                Err(self.form.rejected(&e, &fallback))
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                let banner = e.user_message();
                self.form.banner = Some(banner.clone());
                Err(PageError::Failed(banner))
            }
        }
    }
}
