//! One-shot background GET with cancellation.
//!
//! [`Fetch::spawn`] starts the request on the runtime and returns at once.
//! The result lands in a shared [`FetchState`] unless the fetch was
//! cancelled (or dropped) first, in which case a late response is discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::ApiClient;

/// What a view renders while a fetch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

pub struct Fetch<T> {
    state: Arc<Mutex<FetchState<T>>>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<T: DeserializeOwned + Send + 'static> Fetch<T> {
    /// Start `GET {path}`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(client: &ApiClient, path: impl Into<String>) -> Self {
        let state = Arc::new(Mutex::new(FetchState::default()));
        let cancelled = Arc::new(AtomicBool::new(false));
        let path = path.into();

        let handle = tokio::spawn({
            let client = client.clone();
            let state = Arc::clone(&state);
            let cancelled = Arc::clone(&cancelled);
            async move {
                let result = client.get::<T>(&path).await;
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                // Checked under the lock so cancel() cannot interleave.
                if cancelled.load(Ordering::Acquire) {
                    debug!(path = %path, "Discarding response of cancelled fetch");
                    return;
                }
                state.loading = false;
                match result {
                    Ok(data) => state.data = Some(data),
                    Err(e) => {
                        warn!(error = %e, path = %path, "Fetch failed");
                        state.error = Some(e.user_message());
                    }
                }
            }
        });

        Self {
            state,
            cancelled,
            handle: Some(handle),
        }
    }
}

impl<T> Fetch<T> {
    /// Stop the fetch from updating state. Idempotent.
    pub fn cancel(&self) {
        let _state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).loading
    }

    /// Wait for the request to finish (or be discarded).
    pub async fn wait(&mut self) {
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Fetch task did not complete");
        }
    }
}

impl<T: Clone> Fetch<T> {
    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FetchState<T> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl<T> Drop for Fetch<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T> std::fmt::Debug for Fetch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetch")
            .field("cancelled", &self.is_cancelled())
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}
