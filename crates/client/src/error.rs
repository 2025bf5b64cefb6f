//! Error types for the client library.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::storage::StorageError;

/// Message used for a 401/403 whose body gave no reason.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Errors that can occur when talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with an error status or `success: false`.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API rejected the request body field by field.
    #[error("Validation failed: {}", summarize_fields(.errors))]
    Validation {
        status: u16,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Missing, expired or rejected credentials (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Reading the stored token failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// The text a user should see: the server's own message when it sent
    /// one, otherwise a short description.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) | Self::NotFound(message) => {
                message.clone()
            }
            Self::Validation { errors, .. } => summarize_fields(errors),
            Self::Http(_) => "Could not reach the server".to_string(),
            Self::Parse(_) => "Unexpected response from the server".to_string(),
            Self::Storage(e) => e.to_string(),
        }
    }

    /// HTTP status when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Validation { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn summarize_fields(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .filter_map(|(field, messages)| messages.first().map(|m| format!("{field}: {m}")))
        .collect::<Vec<_>>()
        .join("; ")
}
