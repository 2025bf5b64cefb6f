//! Integration tests for Mindful Ledger.
//!
//! [`FakeApi`] is an in-process stand-in for the REST API: an axum server on
//! an ephemeral port that keeps records as JSON in memory, speaks the same
//! response envelope, checks bearer tokens and counts every request, so
//! tests can assert both on results and on what was (not) sent.
//!
//! ```rust,ignore
//! let api = FakeApi::start().await;
//! api.add_user("ana@example.com", "correct horse", "user");
//! let session = api.logged_in_session("ana@example.com", "correct horse").await;
//! assert_eq!(api.hits("POST", "/auth/login"), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use mindful_ledger_client::storage::{KeyValueStore, MemoryStore};
use mindful_ledger_client::{ApiClient, Session};
use mindful_ledger_core::forms::Credentials;
use mindful_ledger_core::types::Email;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use tokio::task::JoinHandle;
use url::Url;
use uuid::Uuid;

/// Collections served by the generic `/{collection}` routes.
pub const COLLECTIONS: [&str; 6] = [
    "categories",
    "transactions",
    "saving-goals",
    "habits",
    "snapshots",
    "investment-profiles",
];

/// Largest single deposit the fake server accepts.
pub const MAX_DEPOSIT: u32 = 1_000_000;

type Shared = Arc<Mutex<ApiState>>;

struct UserRecord {
    id: Uuid,
    email: String,
    password: String,
    role: String,
    language: String,
    timezone: String,
    created_at: String,
    person: Option<Map<String, Value>>,
}

impl UserRecord {
    fn auth_user(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "role": self.role,
            "language": self.language,
            "timezone": self.timezone,
        })
    }

    fn profile(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "language": self.language,
            "timezone": self.timezone,
            "onboardingCompleted": false,
            "createdAt": self.created_at,
            "person": self.person,
        })
    }
}

#[derive(Default)]
struct ApiState {
    users: Vec<UserRecord>,
    tokens: HashMap<String, usize>,
    collections: HashMap<&'static str, Vec<Value>>,
    /// `(habit id, log record)`.
    habit_logs: Vec<(String, Value)>,
    hits: HashMap<String, usize>,
}

impl ApiState {
    fn records(&mut self, collection: &'static str) -> &mut Vec<Value> {
        self.collections.entry(collection).or_default()
    }

    fn find(&mut self, collection: &'static str, id: &str) -> Option<&mut Value> {
        self.records(collection)
            .iter_mut()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
    }

    fn user(&self, headers: &HeaderMap) -> Result<usize, Response> {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token).copied())
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }

    fn is_admin(&self, user: usize) -> bool {
        self.users.get(user).is_some_and(|u| u.role == "admin")
    }

    fn issue_token(&mut self, user: usize) -> String {
        let token = format!("token-{}", Uuid::new_v4().simple());
        self.tokens.insert(token.clone(), user);
        token
    }

    fn today_snapshot(&mut self) -> Option<&mut Value> {
        let today = today();
        self.records("snapshots")
            .iter_mut()
            .find(|r| r.get("date").and_then(Value::as_str) == Some(today.as_str()))
    }

    /// Embedded `{id, name, icon}` for a transaction's `categoryId`.
    fn category_ref(&mut self, category_id: Option<&Value>) -> Value {
        let Some(id) = category_id.and_then(Value::as_str) else {
            return Value::Null;
        };
        self.find("categories", id).map_or(Value::Null, |c| {
            let field = |key: &str| c.get(key).cloned().unwrap_or(Value::Null);
            json!({"id": field("id"), "name": field("name"), "icon": field("icon")})
        })
    }
}

fn lock(state: &Shared) -> MutexGuard<'_, ApiState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn collection_name(raw: &str) -> Option<&'static str> {
    COLLECTIONS.into_iter().find(|c| *c == raw)
}

fn decimal(value: Option<&Value>) -> Option<Decimal> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

fn ok(data: impl serde::Serialize) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn created(data: impl serde::Serialize) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "data": data, "message": "Created"})),
    )
        .into_response()
}

fn fail(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({"success": false, "error": error}))).into_response()
}

fn invalid(field: &str, message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"success": false, "errors": {field: [message]}})),
    )
        .into_response()
}

fn not_found() -> Response {
    fail(StatusCode::NOT_FOUND, "Resource not found")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn count(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let key = format!(
        "{} {}",
        request.method(),
        path.strip_prefix("/api").unwrap_or(path)
    );
    *lock(&state).hits.entry(key).or_default() += 1;
    next.run(request).await
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let Some(index) = state
        .users
        .iter()
        .position(|u| u.email == email && u.password == password)
    else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    };
    let token = state.issue_token(index);
    let user = state.users.get(index).map(UserRecord::auth_user);
    ok(json!({"token": token, "user": user}))
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    let text = |key: &str| body.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

    let email = text("email");
    if state.users.iter().any(|u| u.email == email) {
        return invalid("email", "Email already registered");
    }
    let mut person = Map::new();
    person.insert("firstName".into(), json!(text("firstName")));
    person.insert("lastName".into(), json!(text("lastName")));

    let language = body.get("language").and_then(Value::as_str).unwrap_or("es");
    let user = UserRecord {
        id: Uuid::new_v4(),
        email,
        password: text("password"),
        role: "user".to_string(),
        language: language.to_string(),
        timezone: text("timezone"),
        created_at: Utc::now().to_rfc3339(),
        person: Some(person),
    };
    let profile = user.profile();
    state.users.push(user);
    created(profile)
}

async fn get_me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    match state.user(&headers) {
        Ok(index) => state.users.get(index).map_or_else(not_found, |u| ok(u.profile())),
        Err(response) => response,
    }
}

async fn update_me(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    let index = match state.user(&headers) {
        Ok(index) => index,
        Err(response) => return response,
    };
    let Some(user) = state.users.get_mut(index) else {
        return not_found();
    };
    let Some(fields) = body.as_object() else {
        return fail(StatusCode::BAD_REQUEST, "Expected an object");
    };

    for (key, value) in fields {
        match key.as_str() {
            "language" => user.language = value.as_str().unwrap_or("es").to_string(),
            "timezone" => user.timezone = value.as_str().unwrap_or("UTC").to_string(),
            _ => {
                user.person
                    .get_or_insert_with(|| {
                        let mut person = Map::new();
                        person.insert("firstName".into(), json!(""));
                        person.insert("lastName".into(), json!(""));
                        person
                    })
                    .insert(key.clone(), value.clone());
            }
        }
    }
    ok(user.profile())
}

async fn change_password(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    let index = match state.user(&headers) {
        Ok(index) => index,
        Err(response) => return response,
    };
    let Some(user) = state.users.get_mut(index) else {
        return not_found();
    };
    let current = body.get("currentPassword").and_then(Value::as_str);
    if current != Some(user.password.as_str()) {
        return fail(StatusCode::BAD_REQUEST, "Wrong password");
    }
    let new = body.get("newPassword").and_then(Value::as_str).unwrap_or_default();
    user.password = new.to_string();
    Json(json!({"success": true, "message": "Password updated"})).into_response()
}

async fn list(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = state.user(&headers) {
        return response;
    }
    let Some(name) = collection_name(&collection) else {
        return not_found();
    };

    let mut records: Vec<Value> = state
        .records(name)
        .iter()
        .filter(|r| matches_query(name, r, &query))
        .cloned()
        .collect();
    if name == "transactions" {
        records.sort_by(|a, b| {
            let at = |r: &Value| r.get("occurredAt").and_then(Value::as_str).map(str::to_owned);
            at(b).cmp(&at(a))
        });
    }
    ok(records)
}

fn matches_query(collection: &str, record: &Value, query: &HashMap<String, String>) -> bool {
    let text = |key: &str| record.get(key).and_then(Value::as_str);
    match collection {
        "habits" => match query.get("active").map(String::as_str) {
            Some("true") => record.get("active") == Some(&Value::Bool(true)),
            Some("false") => record.get("active") == Some(&Value::Bool(false)),
            _ => true,
        },
        "transactions" => {
            let day = text("occurredAt").and_then(|s| s.get(..10)).unwrap_or_default();
            let category = record
                .get("category")
                .and_then(|c| c.get("id"))
                .and_then(Value::as_str);
            query.get("type").is_none_or(|t| text("type") == Some(t.as_str()))
                && query.get("emotionTag").is_none_or(|t| text("emotionTag") == Some(t.as_str()))
                && query.get("categoryId").is_none_or(|c| category == Some(c.as_str()))
                && query.get("startDate").is_none_or(|d| day >= d.as_str())
                && query.get("endDate").is_none_or(|d| day <= d.as_str())
        }
        _ => true,
    }
}

async fn get_one(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = state.user(&headers) {
        return response;
    }
    let Some(name) = collection_name(&collection) else {
        return not_found();
    };
    state.find(name, &id).map_or_else(not_found, |r| ok(&*r))
}

async fn create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    let user = match state.user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(name) = collection_name(&collection) else {
        return not_found();
    };
    if name == "categories" && !state.is_admin(user) {
        return fail(StatusCode::FORBIDDEN, "Admin access required");
    }
    let Value::Object(mut record) = body else {
        return fail(StatusCode::BAD_REQUEST, "Expected an object");
    };

    record.insert("id".into(), json!(Uuid::new_v4()));
    record.insert("createdAt".into(), json!(Utc::now().to_rfc3339()));
    match name {
        "categories" => {
            record.entry("isSystem").or_insert(json!(false));
        }
        "transactions" => {
            let category = state.category_ref(record.get("categoryId"));
            record.remove("categoryId");
            record.insert("category".into(), category);
        }
        "saving-goals" => {
            record.entry("currentAmount").or_insert(json!("0"));
        }
        "habits" => {
            record.entry("active").or_insert(json!(true));
        }
        "snapshots" => {
            if state.today_snapshot().is_some() {
                return fail(StatusCode::CONFLICT, "Today's snapshot already exists");
            }
            record.insert("date".into(), json!(today()));
        }
        _ => {}
    }

    let record = Value::Object(record);
    state.records(name).push(record.clone());
    created(record)
}

async fn update(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    let user = match state.user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(name) = collection_name(&collection) else {
        return not_found();
    };
    if name == "categories" && !state.is_admin(user) {
        return fail(StatusCode::FORBIDDEN, "Admin access required");
    }
    let Some(mut fields) = body.as_object().cloned() else {
        return fail(StatusCode::BAD_REQUEST, "Expected an object");
    };
    if name == "transactions" && fields.contains_key("categoryId") {
        let category = state.category_ref(fields.get("categoryId"));
        fields.remove("categoryId");
        fields.insert("category".into(), category);
    }

    let Some(Value::Object(record)) = state.find(name, &id) else {
        return not_found();
    };
    record.extend(fields);
    ok(&*record)
}

async fn remove(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    let mut state = lock(&state);
    let user = match state.user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(name) = collection_name(&collection) else {
        return not_found();
    };
    if name == "categories" {
        if !state.is_admin(user) {
            return fail(StatusCode::FORBIDDEN, "Admin access required");
        }
        let is_system = state
            .find(name, &id)
            .and_then(|c| c.get("isSystem"))
            .and_then(Value::as_bool);
        if is_system == Some(true) {
            return fail(StatusCode::BAD_REQUEST, "System categories cannot be deleted");
        }
    }

    let records = state.records(name);
    let before = records.len();
    records.retain(|r| r.get("id").and_then(Value::as_str) != Some(id.as_str()));
    if records.len() == before {
        return not_found();
    }
    if name == "habits" {
        state.habit_logs.retain(|(habit, _)| *habit != id);
    }
    Json(json!({"success": true, "data": null, "message": "Deleted"})).into_response()
}

async fn deposit(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = state.user(&headers) {
        return response;
    }
    let Some(amount) = decimal(body.get("amount")).filter(|a| *a > Decimal::ZERO) else {
        return invalid("amount", "Amount must be positive");
    };
    if amount > Decimal::from(MAX_DEPOSIT) {
        return invalid("amount", "Deposit exceeds the single-deposit limit");
    }
    let Some(goal) = state.find("saving-goals", &id) else {
        return not_found();
    };
    let current = decimal(goal.get("currentAmount")).unwrap_or_default();
    if let Some(fields) = goal.as_object_mut() {
        fields.insert("currentAmount".into(), json!((current + amount).to_string()));
    }
    ok(&*goal)
}

async fn list_logs(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = state.user(&headers) {
        return response;
    }
    if state.find("habits", &id).is_none() {
        return not_found();
    }
    let logs: Vec<&Value> = state
        .habit_logs
        .iter()
        .filter(|(habit, _)| *habit == id)
        .map(|(_, log)| log)
        .collect();
    ok(logs)
}

async fn log_habit(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = state.user(&headers) {
        return response;
    }
    if state.find("habits", &id).is_none() {
        return not_found();
    }
    let date = body
        .get("date")
        .and_then(Value::as_str)
        .map_or_else(today, str::to_owned);
    let log = json!({
        "id": Uuid::new_v4(),
        "date": date,
        "completed": body.get("completed").and_then(Value::as_bool).unwrap_or(true),
        "createdAt": Utc::now().to_rfc3339(),
    });
    state.habit_logs.push((id, log.clone()));
    created(log)
}

async fn get_today(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    if let Err(response) = state.user(&headers) {
        return response;
    }
    let today = state.today_snapshot().cloned();
    ok(today)
}

async fn update_today(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = state.user(&headers) {
        return response;
    }
    let Some(fields) = body.as_object().cloned() else {
        return fail(StatusCode::BAD_REQUEST, "Expected an object");
    };
    let Some(Value::Object(snapshot)) = state.today_snapshot() else {
        return not_found();
    };
    snapshot.extend(fields);
    ok(&*snapshot)
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/me", get(get_me).patch(update_me))
        .route("/me/password", patch(change_password))
        .route("/snapshots/today", get(get_today).patch(update_today))
        .route("/saving-goals/{id}/deposit", patch(deposit))
        .route("/habits/{id}/logs", get(list_logs).post(log_habit))
        .route("/{collection}", get(list).post(create))
        .route("/{collection}/{id}", get(get_one).patch(update).delete(remove));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(Arc::clone(&state), count))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Test handle
// ---------------------------------------------------------------------------

/// A running fake API. The server stops when this is dropped.
pub struct FakeApi {
    state: Shared,
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl FakeApi {
    /// Bind an ephemeral port on localhost and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake API listener");
        let addr = listener.local_addr().expect("fake API address");
        let app = router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            state,
            addr,
            server,
        }
    }

    /// Base URL to hand to [`ApiClient`], ending in `/api`.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("fake API URL")
    }

    /// Requests received for `method path`, e.g. `("POST", "/transactions")`.
    #[must_use]
    pub fn hits(&self, method: &str, path: &str) -> usize {
        lock(&self.state)
            .hits
            .get(&format!("{method} {path}"))
            .copied()
            .unwrap_or_default()
    }

    /// Requests received in total.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        lock(&self.state).hits.values().sum()
    }

    /// Register a user directly. `role` is `"user"` or `"admin"`.
    pub fn add_user(&self, email: &str, password: &str, role: &str) -> Uuid {
        let mut person = Map::new();
        person.insert("firstName".into(), json!("Ana"));
        person.insert("lastName".into(), json!("Ruiz"));
        let id = Uuid::new_v4();
        lock(&self.state).users.push(UserRecord {
            id,
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
            language: "es".to_string(),
            timezone: "Europe/Madrid".to_string(),
            created_at: Utc::now().to_rfc3339(),
            person: Some(person),
        });
        id
    }

    /// A valid token for an existing user.
    #[must_use]
    pub fn issue_token(&self, email: &str) -> Option<String> {
        let mut state = lock(&self.state);
        let index = state.users.iter().position(|u| u.email == email)?;
        Some(state.issue_token(index))
    }

    /// The minimal user record login would have stored, as JSON.
    #[must_use]
    pub fn stored_user_json(&self, email: &str) -> Option<String> {
        let state = lock(&self.state);
        let user = state.users.iter().find(|u| u.email == email)?;
        Some(user.auth_user().to_string())
    }

    /// Insert a record as-is, adding `id` and `createdAt` when missing.
    ///
    /// # Panics
    ///
    /// Panics on an unknown collection or a non-object record.
    pub fn seed(&self, collection: &str, record: Value) -> Value {
        let name = collection_name(collection).expect("known collection");
        let Value::Object(mut record) = record else {
            panic!("seed records must be JSON objects");
        };
        record.entry("id").or_insert_with(|| json!(Uuid::new_v4()));
        record
            .entry("createdAt")
            .or_insert_with(|| json!(Utc::now().to_rfc3339()));
        let record = Value::Object(record);
        lock(&self.state).records(name).push(record.clone());
        record
    }

    /// Current server-side copy of a record.
    #[must_use]
    pub fn record(&self, collection: &str, id: &str) -> Option<Value> {
        let name = collection_name(collection)?;
        lock(&self.state).find(name, id).cloned()
    }

    /// Number of records in a collection.
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        collection_name(collection).map_or(0, |name| lock(&self.state).records(name).len())
    }

    /// A client with empty in-memory storage.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self) -> (ApiClient, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let client =
            ApiClient::with_base_url(self.base_url(), Arc::clone(&store)).expect("build client");
        (client, store)
    }

    /// An anonymous, bootstrapped-as-nothing session.
    #[must_use]
    pub fn session(&self) -> Session {
        let (client, store) = self.client();
        Session::new(client, store)
    }

    /// A session logged in through the normal login flow.
    ///
    /// # Panics
    ///
    /// Panics if the credentials are rejected.
    pub async fn logged_in_session(&self, email: &str, password: &str) -> Session {
        let mut session = self.session();
        session.bootstrap().await;
        let credentials = Credentials {
            email: Email::parse(email).expect("valid email"),
            password: password.to_string(),
        };
        session.login(&credentials).await.expect("login");
        session
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl std::fmt::Debug for FakeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeApi").field("addr", &self.addr).finish_non_exhaustive()
    }
}
