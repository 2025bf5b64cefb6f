//! Account profile and password forms.

use chrono::NaiveDate;
use serde::Serialize;

use super::auth::{check_name, check_password};
use super::{FieldErrors, Form, REQUIRED, form_fields, non_blank};
use crate::models::UserProfile;
use crate::types::Language;

form_fields! {
    pub enum ProfileField {
        FirstName => "firstName",
        LastName => "lastName",
        Phone => "phone",
        BirthDate => "birthDate",
        Country => "country",
        AvatarUrl => "avatarUrl",
        Language => "language",
        Timezone => "timezone",
    }
}

form_fields! {
    pub enum PasswordField {
        CurrentPassword => "currentPassword",
        NewPassword => "newPassword",
    }
}

/// Editable copy of the account profile. Blank text means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birth_date: String,
    pub country: String,
    pub avatar_url: String,
    pub language: Option<Language>,
    pub timezone: String,
}

impl From<&UserProfile> for ProfileForm {
    fn from(profile: &UserProfile) -> Self {
        let mut form = Self {
            language: Some(profile.language),
            timezone: profile.timezone.clone(),
            ..Self::default()
        };
        if let Some(person) = &profile.person {
            form.first_name.clone_from(&person.first_name);
            form.last_name.clone_from(&person.last_name);
            form.phone = person.phone.clone().unwrap_or_default();
            form.birth_date = person
                .birth_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            form.country = person.country.clone().unwrap_or_default();
            form.avatar_url = person.avatar_url.clone().unwrap_or_default();
        }
        form
    }
}

/// Body of `PATCH /me`. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Form for ProfileForm {
    type Field = ProfileField;
    type Output = ProfileUpdate;

    fn validate(&self) -> Result<ProfileUpdate, FieldErrors<ProfileField>> {
        let mut errors = FieldErrors::new();

        let first_name = non_blank(&self.first_name);
        if let Some(Err(msg)) = first_name.as_deref().map(check_name) {
            errors.add(ProfileField::FirstName, msg);
        }
        let last_name = non_blank(&self.last_name);
        if let Some(Err(msg)) = last_name.as_deref().map(check_name) {
            errors.add(ProfileField::LastName, msg);
        }

        let birth_date = match non_blank(&self.birth_date) {
            None => None,
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| errors.add(ProfileField::BirthDate, "Use YYYY-MM-DD"))
                .ok(),
        };

        let avatar_url = non_blank(&self.avatar_url);
        if let Some(raw) = avatar_url.as_deref() {
            let valid = url::Url::parse(raw)
                .is_ok_and(|u| matches!(u.scheme(), "http" | "https"));
            if !valid {
                errors.add(ProfileField::AvatarUrl, "Invalid URL");
            }
        }

        errors.into_result(|| ProfileUpdate {
            first_name,
            last_name,
            phone: non_blank(&self.phone),
            birth_date,
            country: non_blank(&self.country),
            avatar_url,
            language: self.language,
            timezone: non_blank(&self.timezone),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
}

/// Body of `PATCH /me/password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl Form for PasswordForm {
    type Field = PasswordField;
    type Output = PasswordChange;

    fn validate(&self) -> Result<PasswordChange, FieldErrors<PasswordField>> {
        let mut errors = FieldErrors::new();
        if self.current_password.is_empty() {
            errors.add(PasswordField::CurrentPassword, REQUIRED);
        }
        if let Err(msg) = check_password(&self.new_password) {
            errors.add(PasswordField::NewPassword, msg);
        }
        errors.into_result(|| PasswordChange {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}
