//! Client-side form state and validation.
//!
//! Each form is a plain struct holding what the user typed (strings for free
//! text and numbers, enums for closed choices). `validate` turns it into the
//! request payload or a [`FieldErrors`] set keyed by that form's own field
//! enum, so a transaction error can never be attached to a login field.
//!
//! Server-side validation failures arrive as `{field: [messages]}` and are
//! mapped onto the same field enum with [`FieldErrors::from_server`].

mod auth;
mod finance;
mod profile;
mod wellbeing;

pub use auth::*;
pub use finance::*;
pub use profile::*;
pub use wellbeing::*;

use std::collections::BTreeMap;
use std::fmt;

/// Message for a missing required value.
pub const REQUIRED: &str = "Required";
/// Message for an amount that is zero, negative, or not a number.
pub const MUST_BE_POSITIVE: &str = "Must be positive";
/// Message for a malformed email address.
pub const INVALID_EMAIL: &str = "Invalid email";
/// Minimum password length accepted by the API.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Minimum length of a first or last name.
pub const MIN_NAME_LENGTH: usize = 2;

/// The fields of one form.
///
/// Implemented by the `form_fields!` enums; `name` is the camelCase key the
/// API uses in its `errors` map.
pub trait FormField: Copy + Ord + fmt::Debug + 'static {
    /// Every field, in display order.
    const ALL: &'static [Self];

    /// Wire name of the field.
    fn name(self) -> &'static str;

    /// Look a field up by its wire name.
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

macro_rules! form_fields {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $crate::forms::FormField for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }
    };
}
pub(crate) use form_fields;

/// Per-field error messages for one form.
///
/// At most one message is kept per field; the first one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: FormField> {
    errors: BTreeMap<F, String>,
}

impl<F: FormField> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message unless the field already has one.
    pub fn add(&mut self, field: F, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// Builder-style [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, field: F, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: F) -> bool {
        self.errors.contains_key(&field)
    }

    /// Forget the message for one field (the user edited it).
    pub fn clear(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn clear_all(&mut self) {
        self.errors.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(value)` when no field failed, otherwise the collected errors.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field has a message.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }

    /// Map a server `errors` object onto this form's fields.
    ///
    /// Takes the first message of each known field. Messages for names the
    /// form does not know are returned separately so the caller can show
    /// them in the banner.
    #[must_use]
    pub fn from_server(errors: &BTreeMap<String, Vec<String>>) -> (Self, Vec<String>) {
        let mut mapped = Self::new();
        let mut unmatched = Vec::new();
        for (name, messages) in errors {
            let Some(first) = messages.first() else {
                continue;
            };
            match F::from_name(name) {
                Some(field) => mapped.add(field, first.clone()),
                None => unmatched.push(format!("{name}: {first}")),
            }
        }
        (mapped, unmatched)
    }
}

impl<F: FormField> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.name())?;
            first = false;
        }
        Ok(())
    }
}

/// A form that can be checked before anything is sent.
pub trait Form {
    /// The field enum errors are keyed by.
    type Field: FormField;
    /// The request body produced by a valid form.
    type Output;

    /// Check every field and build the payload.
    ///
    /// # Errors
    ///
    /// Returns one message per failing field. No field is skipped because an
    /// earlier one failed.
    fn validate(&self) -> Result<Self::Output, FieldErrors<Self::Field>>;
}

/// `None` for blank input, otherwise the trimmed text.
pub(crate) fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Minimum-length message in the form the API also uses.
pub(crate) fn min_chars(n: usize) -> String {
    format!("Must be at least {n} characters")
}

#[cfg(test)]
mod tests {
    use super::*;

    form_fields! {
        pub enum DemoField { Name => "name", TargetAmount => "targetAmount" }
    }

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add(DemoField::Name, "first");
        errors.add(DemoField::Name, "second");
        assert_eq!(errors.get(DemoField::Name), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_from_server_maps_known_fields() {
        let mut server = BTreeMap::new();
        server.insert(
            "targetAmount".to_owned(),
            vec!["too big".to_owned(), "ignored".to_owned()],
        );
        server.insert("somethingElse".to_owned(), vec!["nope".to_owned()]);
        server.insert("name".to_owned(), vec![]);

        let (errors, unmatched) = FieldErrors::<DemoField>::from_server(&server);
        assert_eq!(errors.get(DemoField::TargetAmount), Some("too big"));
        assert!(!errors.contains(DemoField::Name));
        assert_eq!(unmatched, vec!["somethingElse: nope".to_owned()]);
    }

    #[test]
    fn test_clear_and_display() {
        let mut errors = FieldErrors::new()
            .with(DemoField::Name, REQUIRED)
            .with(DemoField::TargetAmount, MUST_BE_POSITIVE);
        assert_eq!(
            errors.to_string(),
            "name: Required; targetAmount: Must be positive"
        );
        errors.clear(DemoField::Name);
        assert!(!errors.contains(DemoField::Name));
        assert!(errors.into_result(|| ()).is_err());
    }
}
