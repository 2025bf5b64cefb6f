//! Session lifecycle against the fake API: login, restore, logout.

#![allow(clippy::unwrap_used)]

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use mindful_ledger_client::guard::{Navigation, Route, navigate};
use mindful_ledger_client::storage::{
    FileStore, KeyValueStore, MemoryStore, StorageError, StorageKey,
};
use mindful_ledger_client::{ApiClient, ApiError, Session, SessionError, SessionState};
use mindful_ledger_core::forms::Credentials;
use mindful_ledger_core::types::{Email, Role};
use mindful_ledger_integration_tests::FakeApi;

const EMAIL: &str = "ana@example.com";
const PASSWORD: &str = "correct horse";

/// Memory storage whose user-record writes (and optionally removals) fail.
struct BrokenUserStore {
    inner: MemoryStore,
    fail_remove: bool,
}

impl BrokenUserStore {
    fn failure(action: &'static str) -> StorageError {
        StorageError::Io {
            action,
            path: PathBuf::from("user"),
            source: io::Error::other("disk full"),
        }
    }
}

impl KeyValueStore for BrokenUserStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        match key {
            StorageKey::User => Err(Self::failure("write")),
            StorageKey::Token => self.inner.set(key, value),
        }
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        if self.fail_remove {
            return Err(Self::failure("remove"));
        }
        self.inner.remove(key)
    }
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        email: Email::parse(EMAIL).unwrap(),
        password: password.to_string(),
    }
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_stores_token_and_user_and_loads_profile() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let (client, store) = api.client();
    let mut session = Session::new(client, Arc::clone(&store));
    session.bootstrap().await;

    session.login(&credentials(PASSWORD)).await.unwrap();

    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.user().unwrap().email.as_str(), EMAIL);
    assert_eq!(session.profile().unwrap().first_name(), Some("Ana"));
    assert!(store.get(StorageKey::Token).unwrap().is_some());
    let stored = store.get(StorageKey::User).unwrap().unwrap();
    assert!(stored.contains(EMAIL));
    assert_eq!(api.hits("POST", "/auth/login"), 1);
    assert_eq!(api.hits("GET", "/me"), 1);
}

#[tokio::test]
async fn test_invalid_credentials_leave_session_anonymous() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let (client, store) = api.client();
    let mut session = Session::new(client, Arc::clone(&store));
    session.bootstrap().await;

    let err = session.login(&credentials("wrong password")).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Api(ApiError::Unauthorized(ref m)) if m == "Invalid email or password"
    ));
    assert!(!session.is_authenticated());
    assert_eq!(store.get(StorageKey::Token).unwrap(), None);
    assert_eq!(store.get(StorageKey::User).unwrap(), None);
    assert_eq!(api.hits("GET", "/me"), 0);
}

#[tokio::test]
async fn test_failed_user_write_rolls_back_token() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let store: Arc<dyn KeyValueStore> = Arc::new(BrokenUserStore {
        inner: MemoryStore::new(),
        fail_remove: false,
    });
    let client = ApiClient::with_base_url(api.base_url(), Arc::clone(&store)).unwrap();
    let mut session = Session::new(client, Arc::clone(&store));
    session.bootstrap().await;

    let err = session.login(&credentials(PASSWORD)).await.unwrap_err();

    assert!(matches!(err, SessionError::Storage(_)));
    assert!(!session.is_authenticated());
    assert_eq!(store.get(StorageKey::Token).unwrap(), None);
    assert_eq!(api.hits("GET", "/me"), 0);
}

#[tokio::test]
async fn test_failed_rollback_still_reports_the_write_error() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let store: Arc<dyn KeyValueStore> = Arc::new(BrokenUserStore {
        inner: MemoryStore::new(),
        fail_remove: true,
    });
    let client = ApiClient::with_base_url(api.base_url(), Arc::clone(&store)).unwrap();
    let mut session = Session::new(client, store);
    session.bootstrap().await;

    let err = session.login(&credentials(PASSWORD)).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Storage(StorageError::Io { action: "write", .. })
    ));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_requests_after_login_carry_the_token() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let session = api.logged_in_session(EMAIL, PASSWORD).await;

    let habits = session.client().list_habits(None).await.unwrap();
    assert!(habits.is_empty());
}

// =============================================================================
// Restore
// =============================================================================

#[tokio::test]
async fn test_restore_with_invalid_token_clears_storage() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let (client, store) = api.client();
    store.set(StorageKey::Token, "revoked-token").unwrap();
    store
        .set(StorageKey::User, &api.stored_user_json(EMAIL).unwrap())
        .unwrap();

    let mut session = Session::new(client, Arc::clone(&store));
    assert_eq!(session.bootstrap().await, SessionState::Anonymous);

    assert!(session.user().is_none());
    assert_eq!(store.get(StorageKey::Token).unwrap(), None);
    assert_eq!(store.get(StorageKey::User).unwrap(), None);
    assert_eq!(api.hits("GET", "/me"), 1);
}

#[tokio::test]
async fn test_restore_with_valid_token_is_authenticated() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "admin");
    let (client, store) = api.client();
    store
        .set(StorageKey::Token, &api.issue_token(EMAIL).unwrap())
        .unwrap();
    store
        .set(StorageKey::User, &api.stored_user_json(EMAIL).unwrap())
        .unwrap();

    let mut session = Session::new(client, store);
    assert!(session.is_loading());
    assert_eq!(session.bootstrap().await, SessionState::Authenticated);
    assert!(session.has_role(Role::Admin));
    assert!(session.profile().is_some());
}

#[tokio::test]
async fn test_token_without_user_record_does_not_restore() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let (client, store) = api.client();
    store
        .set(StorageKey::Token, &api.issue_token(EMAIL).unwrap())
        .unwrap();

    let mut session = Session::new(client, store);
    assert_eq!(session.bootstrap().await, SessionState::Anonymous);
    assert_eq!(api.total_hits(), 0);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let dir = tempfile::tempdir().unwrap();

    let start = || {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
        let client = ApiClient::with_base_url(api.base_url(), Arc::clone(&store)).unwrap();
        Session::new(client, store)
    };

    let mut first = start();
    first.bootstrap().await;
    first.login(&credentials(PASSWORD)).await.unwrap();
    drop(first);

    let mut second = start();
    assert_eq!(second.bootstrap().await, SessionState::Authenticated);
    assert_eq!(second.user().unwrap().email.as_str(), EMAIL);

    second.logout();
    let mut third = start();
    assert_eq!(third.bootstrap().await, SessionState::Anonymous);
}

// =============================================================================
// Logout and guards
// =============================================================================

#[tokio::test]
async fn test_logout_stops_sending_the_token() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let mut session = api.logged_in_session(EMAIL, PASSWORD).await;
    let client = session.client().clone();

    session.logout();

    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(matches!(
        client.list_habits(None).await,
        Err(ApiError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_guards_follow_session_and_role() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");

    let mut session = api.session();
    assert_eq!(navigate(&session, Route::Habits), Navigation::Loading);
    session.bootstrap().await;
    assert_eq!(
        navigate(&session, Route::Habits),
        Navigation::Redirect(Route::Login)
    );
    assert_eq!(navigate(&session, Route::Login), Navigation::Render);

    session.login(&credentials(PASSWORD)).await.unwrap();
    assert_eq!(navigate(&session, Route::Habits), Navigation::Render);
    assert_eq!(
        navigate(&session, Route::Categories),
        Navigation::Redirect(Route::Dashboard)
    );
}
