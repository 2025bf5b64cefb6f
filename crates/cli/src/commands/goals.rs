//! `mledger goals ...`

use clap::{Args, Subcommand};
use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::{CrudPage, SavingGoals};
use mindful_ledger_core::forms::{DepositForm, SavingGoalForm};
use mindful_ledger_core::types::SavingGoalId;

use super::{CliError, Context, set};
use crate::render;

#[derive(Subcommand)]
pub enum GoalAction {
    /// List saving goals with progress
    List,
    /// Create a goal
    Add(GoalArgs),
    /// Change a goal
    Edit {
        id: SavingGoalId,
        #[command(flatten)]
        fields: GoalArgs,
    },
    /// Add money to a goal
    Deposit { id: SavingGoalId, amount: String },
    /// Delete a goal
    Delete { id: SavingGoalId },
}

#[derive(Args)]
pub struct GoalArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    target: Option<String>,

    /// `YYYY-MM-DD`; an empty string clears it
    #[arg(long)]
    date: Option<String>,
}

impl GoalArgs {
    fn apply(self, form: &mut SavingGoalForm) {
        set(&mut form.name, self.name);
        set(&mut form.target_amount, self.target);
        set(&mut form.target_date, self.date);
    }
}

pub async fn run(ctx: &Context, action: GoalAction) -> Result<(), CliError> {
    ctx.enter(Route::SavingGoals)?;
    let mut page: CrudPage<SavingGoals> = CrudPage::new(&ctx.session);

    match action {
        GoalAction::List => {
            page.load().await?;
            render::goals(&page.items);
        }
        GoalAction::Add(fields) => {
            let goal = super::create(&mut page, |form| fields.apply(form)).await?;
            render::goal(&goal);
        }
        GoalAction::Edit { id, fields } => {
            let goal = super::update(&mut page, id, |form| fields.apply(form)).await?;
            render::goal(&goal);
        }
        GoalAction::Deposit { id, amount } => {
            let goal = page.deposit(id, &DepositForm { amount }).await?;
            render::goal(&goal);
        }
        GoalAction::Delete { id } => {
            super::delete(&mut page, id, &ctx.prompt()).await?;
        }
    }
    Ok(())
}
