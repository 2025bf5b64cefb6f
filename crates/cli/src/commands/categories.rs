//! `mledger categories ...` (admin only)

use clap::{Args, Subcommand};
use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::{Categories, CrudPage};
use mindful_ledger_core::forms::CategoryForm;
use mindful_ledger_core::types::{CategoryId, TransactionType};

use super::{CliError, Context, set};
use crate::render;

#[derive(Subcommand)]
pub enum CategoryAction {
    List,
    Add(CategoryArgs),
    Edit {
        id: CategoryId,
        #[command(flatten)]
        fields: CategoryArgs,
    },
    /// Delete a category (system categories cannot be deleted)
    Delete { id: CategoryId },
}

#[derive(Args)]
pub struct CategoryArgs {
    #[arg(long)]
    name: Option<String>,

    /// An emoji, or an empty string for none
    #[arg(long)]
    icon: Option<String>,

    #[arg(long = "type")]
    kind: Option<TransactionType>,
}

impl CategoryArgs {
    fn apply(self, form: &mut CategoryForm) {
        set(&mut form.name, self.name);
        set(&mut form.icon, self.icon);
        set(&mut form.kind, self.kind);
    }
}

pub async fn run(ctx: &Context, action: CategoryAction) -> Result<(), CliError> {
    ctx.enter(Route::Categories)?;
    let mut page: CrudPage<Categories> = CrudPage::new(&ctx.session);

    match action {
        CategoryAction::List => {
            page.load().await?;
            render::categories(&page.items);
        }
        CategoryAction::Add(fields) => {
            let category = super::create(&mut page, |form| fields.apply(form)).await?;
            render::categories(&[category]);
        }
        CategoryAction::Edit { id, fields } => {
            let category = super::update(&mut page, id, |form| fields.apply(form)).await?;
            render::categories(&[category]);
        }
        CategoryAction::Delete { id } => {
            super::delete(&mut page, id, &ctx.prompt()).await?;
        }
    }
    Ok(())
}
