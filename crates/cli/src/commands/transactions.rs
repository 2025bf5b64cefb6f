//! `mledger transactions ...`

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use mindful_ledger_client::TransactionFilters;
use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::TransactionsPage;
use mindful_ledger_core::forms::TransactionForm;
use mindful_ledger_core::types::{CategoryId, EmotionTag, TransactionId, TransactionType};

use super::{CliError, Context, set};
use crate::render;

#[derive(Subcommand)]
pub enum TransactionAction {
    /// List transactions, newest first
    List(FilterArgs),
    /// Record a transaction (dated now unless --at is given)
    Add(TransactionArgs),
    /// Change a transaction
    Edit {
        id: TransactionId,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction
    Delete { id: TransactionId },
    /// Categories available for a type
    Categories {
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    #[arg(long = "type")]
    kind: Option<TransactionType>,

    #[arg(long)]
    category: Option<CategoryId>,

    #[arg(long)]
    emotion: Option<EmotionTag>,

    /// First day, `YYYY-MM-DD`
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day, `YYYY-MM-DD`
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl From<FilterArgs> for TransactionFilters {
    fn from(args: FilterArgs) -> Self {
        Self {
            kind: args.kind,
            category_id: args.category,
            emotion_tag: args.emotion,
            start_date: args.from,
            end_date: args.to,
        }
    }
}

#[derive(Args)]
pub struct TransactionArgs {
    #[arg(long)]
    amount: Option<String>,

    #[arg(long = "type")]
    kind: Option<TransactionType>,

    /// When it happened, e.g. `2026-03-02T09:30` or `2026-03-02`
    #[arg(long)]
    at: Option<String>,

    #[arg(long)]
    emotion: Option<EmotionTag>,

    #[arg(long)]
    note: Option<String>,

    /// Category id; an empty string clears it
    #[arg(long)]
    category: Option<String>,
}

impl TransactionArgs {
    fn apply(self, form: &mut TransactionForm) {
        set(&mut form.amount, self.amount);
        set(&mut form.kind, self.kind);
        set(&mut form.occurred_at, self.at);
        if self.emotion.is_some() {
            form.emotion_tag = self.emotion;
        }
        set(&mut form.note, self.note);
        set(&mut form.category_id, self.category);
    }
}

pub async fn run(ctx: &Context, action: TransactionAction) -> Result<(), CliError> {
    ctx.enter(Route::Transactions)?;
    let mut page = TransactionsPage::new(&ctx.session);

    match action {
        TransactionAction::List(filters) => {
            page.crud.query = filters.into();
            page.crud.load().await?;
            render::transactions(&page.crud.items);
        }
        TransactionAction::Add(fields) => {
            page.open_create();
            fields.apply(&mut page.crud.form.values);
            let tx = page.crud.submit().await?;
            render::transaction(&tx);
        }
        TransactionAction::Edit { id, fields } => {
            let tx = super::update(&mut page.crud, id, |form| fields.apply(form)).await?;
            render::transaction(&tx);
        }
        TransactionAction::Delete { id } => {
            super::delete(&mut page.crud, id, &ctx.prompt()).await?;
        }
        TransactionAction::Categories { kind } => {
            page.load().await?;
            let choices: Vec<_> = page.choices_for(kind).into_iter().cloned().collect();
            render::categories(&choices);
        }
    }
    Ok(())
}
