//! Login and registration forms.

use serde::Serialize;

use super::{
    FieldErrors, Form, INVALID_EMAIL, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH, REQUIRED,
    form_fields, min_chars,
};
use crate::types::{Email, Language};

form_fields! {
    pub enum LoginField { Email => "email", Password => "password" }
}

form_fields! {
    pub enum RegisterField {
        Email => "email",
        Password => "password",
        FirstName => "firstName",
        LastName => "lastName",
        Timezone => "timezone",
        Language => "language",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl Form for LoginForm {
    type Field = LoginField;
    type Output = Credentials;

    fn validate(&self) -> Result<Credentials, FieldErrors<LoginField>> {
        let mut errors = FieldErrors::new();
        let email = parse_email(&self.email)
            .map_err(|msg| errors.add(LoginField::Email, msg))
            .ok();
        if let Err(msg) = check_password(&self.password) {
            errors.add(LoginField::Password, msg);
        }
        match email {
            Some(email) if errors.is_empty() => Ok(Credentials {
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub timezone: String,
    pub language: Option<Language>,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl Registration {
    /// Credentials for the automatic login that follows registration.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl Form for RegisterForm {
    type Field = RegisterField;
    type Output = Registration;

    fn validate(&self) -> Result<Registration, FieldErrors<RegisterField>> {
        let mut errors = FieldErrors::new();
        let email = parse_email(&self.email)
            .map_err(|msg| errors.add(RegisterField::Email, msg))
            .ok();
        if let Err(msg) = check_password(&self.password) {
            errors.add(RegisterField::Password, msg);
        }
        if let Err(msg) = check_name(&self.first_name) {
            errors.add(RegisterField::FirstName, msg);
        }
        if let Err(msg) = check_name(&self.last_name) {
            errors.add(RegisterField::LastName, msg);
        }
        if self.timezone.trim().is_empty() {
            errors.add(RegisterField::Timezone, REQUIRED);
        }

        match email {
            Some(email) if errors.is_empty() => Ok(Registration {
                email,
                password: self.password.clone(),
                first_name: self.first_name.trim().to_owned(),
                last_name: self.last_name.trim().to_owned(),
                timezone: self.timezone.trim().to_owned(),
                language: self.language,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_email(input: &str) -> Result<Email, String> {
    if input.trim().is_empty() {
        return Err(REQUIRED.to_owned());
    }
    Email::parse(input).map_err(|_| INVALID_EMAIL.to_owned())
}

/// Passwords are checked as typed; surrounding spaces count.
pub(crate) fn check_password(input: &str) -> Result<(), String> {
    if input.chars().count() < MIN_PASSWORD_LENGTH {
        Err(min_chars(MIN_PASSWORD_LENGTH))
    } else {
        Ok(())
    }
}

pub(crate) fn check_name(input: &str) -> Result<(), String> {
    if input.trim().chars().count() < MIN_NAME_LENGTH {
        Err(min_chars(MIN_NAME_LENGTH))
    } else {
        Ok(())
    }
}
