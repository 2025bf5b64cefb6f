//! The list + modal form controller shared by every resource page.

use std::fmt;

use mindful_ledger_core::forms::{CategoryForm, Form, InvestmentProfileForm};
use mindful_ledger_core::models::{Category, InvestmentProfile};
use mindful_ledger_core::types::{CategoryId, InvestmentProfileId};
use tracing::{debug, info, warn};

use super::{Confirm, DELETE_FAILED, FormState, LOAD_FAILED, PageError, SAVE_FAILED};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::Session;

pub use super::goals::SavingGoals;
pub use super::habits::Habits;
pub use super::transactions::Transactions;

/// Request body produced by a resource's form.
pub type InputOf<R> = <<R as CrudResource>::Form as Form>::Output;
/// Field enum of a resource's form.
pub type FieldOf<R> = <<R as CrudResource>::Form as Form>::Field;

/// Something a row offers the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
    Deposit,
    LogToday,
    Archive,
    Restore,
}

/// Which form, if any, is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal<Id> {
    Closed,
    Create,
    Edit(Id),
}

/// What happened to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user said no at the prompt.
    Declined,
    /// The row does not offer delete (or is not in the list).
    NotOffered,
}

/// A REST collection a [`CrudPage`] can manage.
#[allow(async_fn_in_trait)]
pub trait CrudResource {
    type Item: Clone + fmt::Debug;
    type Id: Copy + PartialEq + fmt::Display + fmt::Debug;
    type Form: Form + Default + Clone + for<'a> From<&'a Self::Item>;
    /// Extra list parameters, `()` when the list takes none.
    type Query: Default + fmt::Debug;

    /// Singular noun used in prompts, e.g. "habit".
    const NOUN: &'static str;

    fn id(item: &Self::Item) -> Self::Id;

    /// Actions offered on a row.
    fn actions(_item: &Self::Item) -> Vec<RowAction> {
        vec![RowAction::Edit, RowAction::Delete]
    }

    async fn list(client: &ApiClient, query: &Self::Query) -> Result<Vec<Self::Item>, ApiError>;

    async fn create(client: &ApiClient, input: &InputOf<Self>) -> Result<Self::Item, ApiError>;

    async fn update(
        client: &ApiClient,
        id: Self::Id,
        input: &InputOf<Self>,
    ) -> Result<Self::Item, ApiError>;

    async fn delete(client: &ApiClient, id: Self::Id) -> Result<(), ApiError>;
}

/// List, create, edit and delete one resource.
pub struct CrudPage<R: CrudResource> {
    client: ApiClient,
    pub items: Vec<R::Item>,
    pub query: R::Query,
    pub loading: bool,
    pub modal: Modal<R::Id>,
    pub form: FormState<R::Form, FieldOf<R>>,
    /// Page-level message for load, delete and row-action failures.
    pub banner: Option<String>,
}

impl<R: CrudResource> CrudPage<R> {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            client: session.client().clone(),
            items: Vec::new(),
            query: R::Query::default(),
            loading: false,
            modal: Modal::Closed,
            form: FormState::new(R::Form::default()),
            banner: None,
        }
    }

    pub(crate) const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch the list. On failure the old list is kept and the banner set.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in the banner.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let result = R::list(&self.client, &self.query).await;
        self.loading = false;
        self.set_items(result)
    }

    pub(crate) fn set_items(&mut self, result: Result<Vec<R::Item>, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(items) => {
                debug!(count = items.len(), resource = R::NOUN, "Loaded list");
                self.items = items;
                self.banner = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, resource = R::NOUN, "Failed to load list");
                self.banner = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Reload after a mutation; a failure only shows in the banner.
    pub(crate) async fn reload(&mut self) {
        if self.load().await.is_err() {
            debug!(resource = R::NOUN, "Reload after mutation failed");
        }
    }

    #[must_use]
    pub fn item(&self, id: R::Id) -> Option<&R::Item> {
        self.items.iter().find(|item| R::id(item) == id)
    }

    /// Open an empty form.
    pub fn open_create(&mut self) {
        self.form.reset(R::Form::default());
        self.modal = Modal::Create;
    }

    /// Open the form prefilled from a listed item. Returns false if the item
    /// is not in the list.
    pub fn open_edit(&mut self, id: R::Id) -> bool {
        let Some(values) = self.item(id).map(R::Form::from) else {
            return false;
        };
        self.form.reset(values);
        self.modal = Modal::Edit(id);
        true
    }

    pub fn close(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Change one field of the open form, clearing its error.
    pub fn edit(&mut self, field: FieldOf<R>, apply: impl FnOnce(&mut R::Form)) {
        self.form.edit(field, apply);
    }

    /// Validate, then create or update, close the form and reload.
    ///
    /// # Errors
    ///
    /// [`PageError::Invalid`] without any request when validation fails,
    /// [`PageError::Rejected`] for server field errors, otherwise
    /// [`PageError::Failed`] with the banner text. The form stays open.
    pub async fn submit(&mut self) -> Result<R::Item, PageError<FieldOf<R>>> {
        let target = self.modal;
        if target == Modal::Closed {
            return Err(PageError::Failed("No form is open".to_string()));
        }

        self.form.banner = None;
        let input = match self.form.values.validate() {
            Ok(input) => input,
            Err(errors) => return Err(self.form.invalid(errors)),
        };

        self.form.saving = true;
        let result = match target {
            Modal::Edit(id) => R::update(&self.client, id, &input).await,
            _ => R::create(&self.client, &input).await,
        };
        self.form.saving = false;

        match result {
            Ok(item) => {
                info!(resource = R::NOUN, id = %R::id(&item), "Saved");
                self.modal = Modal::Closed;
                self.reload().await;
                Ok(item)
            }
            Err(e) => Err(self.form.rejected(&e, SAVE_FAILED)),
        }
    }

    #[must_use]
    pub fn actions(&self, item: &R::Item) -> Vec<RowAction> {
        R::actions(item)
    }

    #[must_use]
    pub fn can_delete(&self, item: &R::Item) -> bool {
        R::actions(item).contains(&RowAction::Delete)
    }

    /// Ask, delete and reload.
    ///
    /// Nothing is sent when the row does not offer delete or the prompt is
    /// declined.
    ///
    /// # Errors
    ///
    /// Returns the API error when the delete call fails.
    pub async fn delete(
        &mut self,
        id: R::Id,
        confirm: &impl Confirm,
    ) -> Result<DeleteOutcome, ApiError> {
        match self.item(id) {
            Some(item) if self.can_delete(item) => {}
            _ => return Ok(DeleteOutcome::NotOffered),
        }
        if !confirm.confirm(&format!("Delete {}?", R::NOUN)) {
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(e) = R::delete(&self.client, id).await {
            warn!(error = %e, resource = R::NOUN, %id, "Delete failed");
            self.banner = Some(DELETE_FAILED.to_string());
            return Err(e);
        }
        info!(resource = R::NOUN, %id, "Deleted");
        self.reload().await;
        Ok(DeleteOutcome::Deleted)
    }
}

impl<R: CrudResource> fmt::Debug for CrudPage<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudPage")
            .field("resource", &R::NOUN)
            .field("items", &self.items.len())
            .field("modal", &self.modal)
            .field("banner", &self.banner)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Admin-only category management.
#[derive(Debug)]
pub enum Categories {}

impl CrudResource for Categories {
    type Item = Category;
    type Id = CategoryId;
    type Form = CategoryForm;
    type Query = ();

    const NOUN: &'static str = "category";

    fn id(item: &Category) -> CategoryId {
        item.id
    }

    /// System categories can be edited but never deleted.
    fn actions(item: &Category) -> Vec<RowAction> {
        if item.is_system {
            vec![RowAction::Edit]
        } else {
            vec![RowAction::Edit, RowAction::Delete]
        }
    }

    async fn list(client: &ApiClient, _: &()) -> Result<Vec<Category>, ApiError> {
        client.list_categories().await
    }

    async fn create(client: &ApiClient, input: &InputOf<Self>) -> Result<Category, ApiError> {
        client.create_category(input).await
    }

    async fn update(
        client: &ApiClient,
        id: CategoryId,
        input: &InputOf<Self>,
    ) -> Result<Category, ApiError> {
        client.update_category(id, input).await
    }

    async fn delete(client: &ApiClient, id: CategoryId) -> Result<(), ApiError> {
        client.delete_category(id).await
    }
}

// ---------------------------------------------------------------------------
// Investment profiles
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum InvestmentProfiles {}

impl CrudResource for InvestmentProfiles {
    type Item = InvestmentProfile;
    type Id = InvestmentProfileId;
    type Form = InvestmentProfileForm;
    type Query = ();

    const NOUN: &'static str = "investment profile";

    fn id(item: &InvestmentProfile) -> InvestmentProfileId {
        item.id
    }

    async fn list(client: &ApiClient, _: &()) -> Result<Vec<InvestmentProfile>, ApiError> {
        client.list_investment_profiles().await
    }

    async fn create(
        client: &ApiClient,
        input: &InputOf<Self>,
    ) -> Result<InvestmentProfile, ApiError> {
        client.create_investment_profile(input).await
    }

    async fn update(
        client: &ApiClient,
        id: InvestmentProfileId,
        input: &InputOf<Self>,
    ) -> Result<InvestmentProfile, ApiError> {
        client.update_investment_profile(id, input).await
    }

    async fn delete(client: &ApiClient, id: InvestmentProfileId) -> Result<(), ApiError> {
        client.delete_investment_profile(id).await
    }
}
