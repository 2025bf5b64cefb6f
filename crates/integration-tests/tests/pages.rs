//! Page controllers end to end: validation stays local, mutations reload.

#![allow(clippy::unwrap_used)]

use mindful_ledger_client::pages::{
    Categories, CrudPage, DeleteOutcome, Habits, InvestmentProfiles, LoginPage, Modal,
    PASSWORD_REJECTED, PageError, ProfilePage, RegisterPage, SavingGoals, SnapshotsPage,
    TransactionsPage,
};
use mindful_ledger_client::{Session, SessionState, TransactionFilters};
use mindful_ledger_core::forms::{
    DepositField, DepositForm, InvestmentField, InvestmentProfileForm, LoginField,
    MUST_BE_POSITIVE, NOT_A_NUMBER, PasswordForm, RegisterField, RegisterForm, TransactionField,
};
use mindful_ledger_core::types::{InvestmentStrategy, Money, Mood, TransactionType};
use mindful_ledger_integration_tests::{FakeApi, MAX_DEPOSIT};
use rust_decimal::Decimal;
use serde_json::json;

const EMAIL: &str = "ana@example.com";
const PASSWORD: &str = "correct horse";

async fn setup(role: &str) -> (FakeApi, Session) {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, role);
    let session = api.logged_in_session(EMAIL, PASSWORD).await;
    (api, session)
}

fn yes(_: &str) -> bool {
    true
}

// =============================================================================
// Local validation
// =============================================================================

#[tokio::test]
async fn test_invalid_transaction_is_never_sent() {
    let (api, session) = setup("user").await;
    let mut page = TransactionsPage::new(&session);
    let before = api.total_hits();

    page.open_create();
    page.crud.form.values.amount = "-5".into();
    let err = page.crud.submit().await.unwrap_err();

    assert!(matches!(err, PageError::Invalid(_)));
    assert_eq!(
        page.crud.form.errors.get(TransactionField::Amount),
        Some(MUST_BE_POSITIVE)
    );
    assert_eq!(api.hits("POST", "/transactions"), 0);
    assert_eq!(api.total_hits(), before);
}

#[tokio::test]
async fn test_login_page_bad_email_is_never_sent() {
    let api = FakeApi::start().await;
    let mut session = api.session();
    session.bootstrap().await;

    let mut page = LoginPage::new();
    page.form.values.email = "no-at-sign".into();
    page.form.values.password = "short".into();
    let err = page.submit(&mut session).await.unwrap_err();

    let errors = err.field_errors().unwrap();
    assert!(errors.contains(LoginField::Email));
    assert!(errors.contains(LoginField::Password));
    assert_eq!(api.total_hits(), 0);
}

// =============================================================================
// Auth pages
// =============================================================================

#[tokio::test]
async fn test_login_page_shows_server_message() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let mut session = api.session();
    session.bootstrap().await;

    let mut page = LoginPage::new();
    page.form.values.email = EMAIL.into();
    page.form.values.password = "not the password".into();
    let err = page.submit(&mut session).await.unwrap_err();

    assert!(matches!(err, PageError::Failed(ref m) if m == "Invalid email or password"));
    assert_eq!(page.form.banner.as_deref(), Some("Invalid email or password"));
    assert_eq!(session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_register_logs_in_automatically() {
    let api = FakeApi::start().await;
    let mut session = api.session();
    session.bootstrap().await;

    let mut page = RegisterPage::new();
    page.form.values = RegisterForm {
        email: "luis@example.com".into(),
        password: "long enough".into(),
        first_name: "Luis".into(),
        last_name: "Pardo".into(),
        timezone: "America/Lima".into(),
        language: None,
    };
    page.submit(&mut session).await.unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.profile().unwrap().first_name(), Some("Luis"));
    assert_eq!(api.hits("POST", "/auth/register"), 1);
    assert_eq!(api.hits("POST", "/auth/login"), 1);
}

#[tokio::test]
async fn test_register_duplicate_email_maps_onto_field() {
    let api = FakeApi::start().await;
    api.add_user(EMAIL, PASSWORD, "user");
    let mut session = api.session();
    session.bootstrap().await;

    let mut page = RegisterPage::new();
    page.form.values = RegisterForm {
        email: EMAIL.into(),
        password: "long enough".into(),
        first_name: "Ana".into(),
        last_name: "Ruiz".into(),
        timezone: "Europe/Madrid".into(),
        language: None,
    };
    let err = page.submit(&mut session).await.unwrap_err();

    assert!(matches!(err, PageError::Rejected(_)));
    assert_eq!(
        page.form.errors.get(RegisterField::Email),
        Some("Email already registered")
    );
    assert!(!session.is_authenticated());
    assert_eq!(api.hits("POST", "/auth/login"), 0);
}

// =============================================================================
// Saving goals
// =============================================================================

#[tokio::test]
async fn test_deposit_increases_current_amount_exactly() {
    let (api, session) = setup("user").await;
    let goal = api.seed(
        "saving-goals",
        json!({"name": "Trip", "targetAmount": "1000", "currentAmount": "100.50", "targetDate": null}),
    );
    let id = goal["id"].as_str().unwrap().parse().unwrap();

    let mut page: CrudPage<SavingGoals> = CrudPage::new(&session);
    page.load().await.unwrap();
    let updated = page
        .deposit(id, &DepositForm { amount: "25.25".into() })
        .await
        .unwrap();

    let expected = Money::new(Decimal::new(12575, 2));
    assert_eq!(updated.current_amount, expected);
    assert_eq!(page.item(id).unwrap().current_amount, expected);
    assert_eq!(page.item(id).unwrap().progress_percent(), 13);
    assert_eq!(api.hits("GET", "/saving-goals"), 2);
}

#[tokio::test]
async fn test_zero_deposit_is_never_sent() {
    let (api, session) = setup("user").await;
    let goal = api.seed(
        "saving-goals",
        json!({"name": "Trip", "targetAmount": "1000", "currentAmount": "0"}),
    );
    let id = goal["id"].as_str().unwrap().parse().unwrap();

    let mut page: CrudPage<SavingGoals> = CrudPage::new(&session);
    let err = page.deposit(id, &DepositForm { amount: "0".into() }).await.unwrap_err();

    assert!(matches!(err, PageError::Invalid(_)));
    assert_eq!(api.hits("PATCH", &format!("/saving-goals/{id}/deposit")), 0);
}

#[tokio::test]
async fn test_comma_deposit_is_never_sent() {
    let (api, session) = setup("user").await;
    let goal = api.seed(
        "saving-goals",
        json!({"name": "Trip", "targetAmount": "1000", "currentAmount": "0"}),
    );
    let id = goal["id"].as_str().unwrap().parse().unwrap();

    let mut page: CrudPage<SavingGoals> = CrudPage::new(&session);
    let err = page.deposit(id, &DepositForm { amount: "1,5".into() }).await.unwrap_err();

    assert_eq!(
        err.field_errors().unwrap().get(DepositField::Amount),
        Some(NOT_A_NUMBER)
    );
    assert_eq!(api.hits("PATCH", &format!("/saving-goals/{id}/deposit")), 0);
}

#[tokio::test]
async fn test_server_rejected_deposit_lands_on_amount_field() {
    let (api, session) = setup("user").await;
    let goal = api.seed(
        "saving-goals",
        json!({"name": "House", "targetAmount": "5000000", "currentAmount": "0"}),
    );
    let id = goal["id"].as_str().unwrap().parse().unwrap();

    let mut page: CrudPage<SavingGoals> = CrudPage::new(&session);
    page.load().await.unwrap();
    let too_much = DepositForm {
        amount: (MAX_DEPOSIT + 1).to_string(),
    };
    let err = page.deposit(id, &too_much).await.unwrap_err();

    let PageError::Rejected(errors) = err else {
        panic!("expected field errors, got {err:?}");
    };
    assert_eq!(
        errors.get(DepositField::Amount),
        Some("Deposit exceeds the single-deposit limit")
    );
    assert!(page.banner.is_none());
    assert_eq!(api.hits("PATCH", &format!("/saving-goals/{id}/deposit")), 1);
    assert_eq!(page.item(id).unwrap().current_amount, Money::ZERO);
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_system_category_is_never_deleted() {
    let (api, session) = setup("admin").await;
    let system = api.seed(
        "categories",
        json!({"name": "Food", "icon": "🍎", "type": "expense", "isSystem": true}),
    );
    let custom = api.seed(
        "categories",
        json!({"name": "Vinyl", "icon": null, "type": "expense", "isSystem": false}),
    );
    let system_id = system["id"].as_str().unwrap().parse().unwrap();
    let custom_id = custom["id"].as_str().unwrap().parse().unwrap();

    let mut page: CrudPage<Categories> = CrudPage::new(&session);
    page.load().await.unwrap();

    let listed = page.item(system_id).unwrap().clone();
    assert!(!page.can_delete(&listed));
    assert_eq!(
        page.delete(system_id, &yes).await.unwrap(),
        DeleteOutcome::NotOffered
    );
    assert_eq!(api.hits("DELETE", &format!("/categories/{system_id}")), 0);

    assert_eq!(page.delete(custom_id, &yes).await.unwrap(), DeleteOutcome::Deleted);
    assert_eq!(api.count("categories"), 1);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let (api, session) = setup("user").await;
    let habit = api.seed(
        "habits",
        json!({"name": "Walk", "frequency": "daily", "active": true}),
    );
    let id = habit["id"].as_str().unwrap().parse().unwrap();

    let mut page: CrudPage<Habits> = CrudPage::new(&session);
    page.load().await.unwrap();
    let outcome = page.delete(id, &|_: &str| false).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(api.count("habits"), 1);
    assert_eq!(api.hits("DELETE", &format!("/habits/{id}")), 0);
}

// =============================================================================
// Transactions
// =============================================================================

#[tokio::test]
async fn test_transactions_page_loads_categories_and_creates() {
    let (api, session) = setup("user").await;
    let food = api.seed(
        "categories",
        json!({"name": "Food", "icon": null, "type": "expense", "isSystem": true}),
    );
    api.seed(
        "categories",
        json!({"name": "Salary", "icon": null, "type": "income", "isSystem": true}),
    );

    let mut page = TransactionsPage::new(&session);
    page.load().await.unwrap();
    assert_eq!(page.categories.len(), 2);
    assert_eq!(page.category_choices().len(), 1);

    page.open_create();
    page.crud.form.values.amount = "42.50".into();
    page.crud.form.values.category_id = food["id"].as_str().unwrap().to_string();
    page.crud.form.values.note = "Groceries".into();
    let created = page.crud.submit().await.unwrap();

    assert_eq!(created.category.as_ref().unwrap().name, "Food");
    assert_eq!(page.crud.modal, Modal::Closed);
    assert_eq!(page.crud.items.len(), 1);
    assert_eq!(api.hits("POST", "/transactions"), 1);
}

#[tokio::test]
async fn test_transaction_filters_reach_the_server() {
    let (api, session) = setup("user").await;
    for (amount, kind, at) in [
        ("10", "expense", "2026-01-03T09:00:00Z"),
        ("20", "income", "2026-01-10T09:00:00Z"),
        ("30", "expense", "2026-02-01T09:00:00Z"),
    ] {
        api.seed(
            "transactions",
            json!({"amount": amount, "type": kind, "occurredAt": at}),
        );
    }

    let mut page = TransactionsPage::new(&session);
    page.filter(TransactionFilters {
        kind: Some(TransactionType::Expense),
        end_date: "2026-01-31".parse().ok(),
        ..TransactionFilters::default()
    })
    .await
    .unwrap();

    assert_eq!(page.crud.items.len(), 1);
    assert_eq!(page.crud.items[0].amount, Money::new(Decimal::new(10, 0)));
}

// =============================================================================
// Investment profiles
// =============================================================================

#[tokio::test]
async fn test_investment_profile_create_edit_delete() {
    let (api, session) = setup("user").await;
    let mut page: CrudPage<InvestmentProfiles> = CrudPage::new(&session);
    page.load().await.unwrap();
    assert!(page.items.is_empty());

    page.open_create();
    page.form.values = InvestmentProfileForm {
        strategy: InvestmentStrategy::LongTerm,
        monthly_amount: "250".into(),
        expected_return: "7".into(),
    };
    let created = page.submit().await.unwrap();
    assert_eq!(created.strategy, InvestmentStrategy::LongTerm);
    assert_eq!(created.monthly_amount, Money::new(Decimal::new(250, 0)));
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.modal, Modal::Closed);

    assert!(page.open_edit(created.id));
    assert_eq!(page.form.values.monthly_amount, "250");
    page.form.values.expected_return = "9".into();
    let updated = page.submit().await.unwrap();
    assert_eq!(updated.expected_return, Decimal::new(9, 0));
    assert_eq!(page.item(created.id).unwrap().expected_return, Decimal::new(9, 0));
    assert_eq!(
        api.hits("PATCH", &format!("/investment-profiles/{}", created.id)),
        1
    );

    let outcome = page.delete(created.id, &yes).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(page.items.is_empty());
    assert_eq!(api.count("investment-profiles"), 0);
}

#[tokio::test]
async fn test_investment_return_over_100_is_never_sent() {
    let (api, session) = setup("user").await;
    let mut page: CrudPage<InvestmentProfiles> = CrudPage::new(&session);

    page.open_create();
    page.form.values = InvestmentProfileForm {
        strategy: InvestmentStrategy::Conservative,
        monthly_amount: "100".into(),
        expected_return: "120".into(),
    };
    let err = page.submit().await.unwrap_err();

    assert!(matches!(err, PageError::Invalid(_)));
    assert!(page.form.errors.contains(InvestmentField::ExpectedReturn));
    assert_eq!(page.modal, Modal::Create);
    assert_eq!(api.hits("POST", "/investment-profiles"), 0);
}

// =============================================================================
// Habits
// =============================================================================

#[tokio::test]
async fn test_habit_archive_log_and_history() {
    let (api, session) = setup("user").await;
    let habit = api.seed(
        "habits",
        json!({"name": "Read", "frequency": "daily", "active": true}),
    );
    let id = habit["id"].as_str().unwrap().parse().unwrap();

    let mut page: CrudPage<Habits> = CrudPage::new(&session);
    page.load().await.unwrap();

    let log = page.log_today(id).await.unwrap();
    assert!(log.completed);
    assert_eq!(page.history(id).await.unwrap().len(), 1);

    let archived = page.toggle_active(id).await.unwrap();
    assert!(!archived.active);
    assert_eq!(page.active().count(), 0);
    assert_eq!(page.archived().count(), 1);
}

// =============================================================================
// Snapshots
// =============================================================================

#[tokio::test]
async fn test_snapshot_creates_then_updates_today() {
    let (api, session) = setup("user").await;
    let mut page = SnapshotsPage::new(&session);
    page.load().await.unwrap();
    assert!(!page.has_today());

    page.open_form();
    page.form.values.mood = Some(Mood::Calm);
    page.form.values.conscious_score = "6".into();
    page.submit().await.unwrap();
    assert_eq!(api.hits("POST", "/snapshots"), 1);
    assert!(page.has_today());

    page.open_form();
    assert_eq!(page.form.values.conscious_score, "6");
    page.form.values.conscious_score = "8".into();
    let updated = page.submit().await.unwrap();

    assert_eq!(updated.conscious_score, Some(8));
    assert_eq!(api.hits("PATCH", "/snapshots/today"), 1);
    assert_eq!(api.hits("POST", "/snapshots"), 1);
    assert_eq!(api.count("snapshots"), 1);
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_profile_update_refreshes_session() {
    let (_api, mut session) = setup("user").await;
    let mut page = ProfilePage::new(&session);
    assert_eq!(page.profile.values.first_name, "Ana");

    page.profile.values.first_name = "Anabel".into();
    page.submit_profile(&mut session).await.unwrap();

    assert_eq!(session.profile().unwrap().first_name(), Some("Anabel"));
    assert!(page.notice.is_some());
}

#[tokio::test]
async fn test_wrong_current_password_shows_fixed_message() {
    let (api, session) = setup("user").await;
    let mut page = ProfilePage::new(&session);
    page.password.values = PasswordForm {
        current_password: "not it".into(),
        new_password: "brand new secret".into(),
    };

    let err = page.submit_password(&session).await.unwrap_err();
    assert!(matches!(err, PageError::Failed(ref m) if m == PASSWORD_REJECTED));
    assert_eq!(api.hits("PATCH", "/me/password"), 1);

    page.password.values.current_password = PASSWORD.into();
    page.submit_password(&session).await.unwrap();
    assert_eq!(page.password.values, PasswordForm::default());
}
