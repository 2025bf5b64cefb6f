//! `mledger habits ...`

use clap::{Args, Subcommand};
use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::{CrudPage, Habits};
use mindful_ledger_core::forms::HabitForm;
use mindful_ledger_core::types::{HabitFrequency, HabitId};

use super::{CliError, Context, not_found, set};
use crate::render;

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits
    List {
        /// Show archived habits instead of active ones
        #[arg(long)]
        archived: bool,
    },
    /// Start tracking a habit
    Add(HabitArgs),
    /// Rename a habit or change its frequency
    Edit {
        id: HabitId,
        #[command(flatten)]
        fields: HabitArgs,
    },
    /// Mark a habit done today
    Log { id: HabitId },
    /// Completion history
    History { id: HabitId },
    /// Stop tracking without deleting
    Archive { id: HabitId },
    /// Track an archived habit again
    Restore { id: HabitId },
    /// Delete a habit and its logs
    Delete { id: HabitId },
}

#[derive(Args)]
pub struct HabitArgs {
    #[arg(long)]
    name: Option<String>,

    /// `daily` or `weekly`
    #[arg(long)]
    frequency: Option<HabitFrequency>,
}

impl HabitArgs {
    fn apply(self, form: &mut HabitForm) {
        set(&mut form.name, self.name);
        set(&mut form.frequency, self.frequency);
    }
}

pub async fn run(ctx: &Context, action: HabitAction) -> Result<(), CliError> {
    ctx.enter(Route::Habits)?;
    let mut page: CrudPage<Habits> = CrudPage::new(&ctx.session);

    match action {
        HabitAction::List { archived } => {
            page.load().await?;
            if archived {
                render::habits(page.archived());
            } else {
                render::habits(page.active());
            }
        }
        HabitAction::Add(fields) => {
            let habit = super::create(&mut page, |form| fields.apply(form)).await?;
            render::habit(&habit);
        }
        HabitAction::Edit { id, fields } => {
            let habit = super::update(&mut page, id, |form| fields.apply(form)).await?;
            render::habit(&habit);
        }
        HabitAction::Log { id } => {
            let log = page.log_today(id).await?;
            render::done(&format!("Logged for {}.", log.date));
        }
        HabitAction::History { id } => {
            let logs = page.history(id).await?;
            render::habit_logs(&logs);
        }
        HabitAction::Archive { id } => set_active(&mut page, id, false).await?,
        HabitAction::Restore { id } => set_active(&mut page, id, true).await?,
        HabitAction::Delete { id } => {
            super::delete(&mut page, id, &ctx.prompt()).await?;
        }
    }
    Ok(())
}

async fn set_active(page: &mut CrudPage<Habits>, id: HabitId, active: bool) -> Result<(), CliError> {
    page.load().await?;
    let current = page.item(id).ok_or_else(|| not_found::<Habits>(id))?;
    if current.active == active {
        render::habit(current);
        return Ok(());
    }
    let habit = page.toggle_active(id).await?;
    render::habit(&habit);
    Ok(())
}
