//! REST API client.
//!
//! One method per endpoint, grouped by resource in the submodules. Every call
//! issues exactly one HTTP request and unwraps the response envelope:
//!
//! - success: `{"success": true, "data": ..., "message"?: "..."}`
//! - failure: `{"success": false, "error": "..."}` or
//!   `{"success": false, "errors": {"field": ["message", ...]}}`
//!
//! The bearer token is read from storage on every request, except for the
//! `/auth/*` endpoints, so a login or logout takes effect immediately for any
//! clone of the client.

mod auth;
mod categories;
mod habits;
mod investment_profiles;
mod saving_goals;
mod snapshots;
mod transactions;

pub use transactions::TransactionFilters;

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, UNAUTHORIZED_MESSAGE};
use crate::storage::{KeyValueStore, StorageKey};

/// Paths under this prefix never carry the bearer token.
const AUTH_PREFIX: &str = "/auth/";

/// Mindful Ledger API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn KeyValueStore>,
}

/// Response envelope. `data` stays raw so `null` can mean "nothing" for
/// endpoints like `/snapshots/today`.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: serde_json::Value,
    message: Option<String>,
    error: Option<String>,
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        Self::with_base_url(config.api_url.clone(), store)
    }

    /// Create a client for an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(base_url: Url, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mindful-ledger/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                store,
            }),
        })
    }

    /// The store the token is read from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Absolute URL for an endpoint path such as `/habits/123`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|e| ApiError::Parse(format!("Invalid request URL for {path}: {e}")))
    }

    fn token(&self) -> Result<Option<SecretString>, ApiError> {
        Ok(self
            .inner
            .store
            .get(StorageKey::Token)?
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from))
    }

    /// Start a request, attaching the bearer token when one is stored.
    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        debug!(%method, path = url.path(), "API request");
        let builder = self.inner.http.request(method, url.clone());
        let is_auth = url
            .path()
            .strip_prefix(self.inner.base_url.path().trim_end_matches('/'))
            .is_some_and(|p| p.starts_with(AUTH_PREFIX));
        if is_auth {
            return Ok(builder);
        }
        Ok(match self.token()? {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        self.get_url(url).await
    }

    /// Execute a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        self.get_url(url).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.request(Method::GET, url)?.send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let response = self.request(Method::POST, url)?.json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a PATCH request.
    pub(crate) async fn patch<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let response = self.request(Method::PATCH, url)?.json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request. Any `data` in the reply is ignored.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path)?;
        let response = self.request(Method::DELETE, url)?.send().await?;
        let _: serde_json::Value = Self::handle_response(response).await?;
        Ok(())
    }

    /// Check the status, unwrap the envelope and decode `data`.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let ok = response.status().is_success();
        let body = response.text().await?;

        // 204 and other empty successes carry no envelope.
        if ok && body.trim().is_empty() {
            return decode(serde_json::Value::Null);
        }

        let envelope = serde_json::from_str::<Envelope>(&body);
        match envelope {
            Ok(envelope) if ok && envelope.success => {
                if let Some(message) = &envelope.message {
                    debug!(message = %message, "API message");
                }
                decode(envelope.data)
            }
            Ok(envelope) => Err(envelope_error(status, envelope)),
            Err(e) if ok => Err(ApiError::Parse(format!("Failed to parse response: {e}"))),
            Err(_) => Err(status_error(status, body)),
        }
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(data)
        .map_err(|e| ApiError::Parse(format!("Failed to parse response data: {e}")))
}

/// Map a `success: false` envelope (or an error status with an envelope).
fn envelope_error(status: u16, envelope: Envelope) -> ApiError {
    // A 2xx with success: false is still a failure; report it as 400.
    let status = if (200..300).contains(&status) {
        400
    } else {
        status
    };

    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        return ApiError::Validation { status, errors };
    }

    let message = envelope
        .error
        .or(envelope.message)
        .unwrap_or_else(|| default_message(status).to_string());
    classify(status, message)
}

/// Map an error status whose body is not an envelope.
fn status_error(status: u16, body: String) -> ApiError {
    let body = body.trim();
    let message = if body.is_empty() || body.len() > 200 {
        default_message(status).to_string()
    } else {
        body.to_string()
    };
    warn!(status, "API returned a non-envelope error body");
    classify(status, message)
}

fn classify(status: u16, message: String) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(message),
        _ => ApiError::Api { status, message },
    }
}

const fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => UNAUTHORIZED_MESSAGE,
        403 => "Forbidden",
        404 => "Not found",
        409 => "Conflict",
        500..=599 => "Server error",
        _ => "Request failed",
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
