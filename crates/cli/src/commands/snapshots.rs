//! `mledger snapshots ...`

use clap::Subcommand;
use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::SnapshotsPage;
use mindful_ledger_core::types::Mood;

use super::{CliError, Context, set};
use crate::render;

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// All snapshots
    List,
    /// Today's snapshot, if any
    Today,
    /// Create or update today's snapshot
    Save {
        /// `calm`, `stressed`, `confident` or `neutral`
        #[arg(long)]
        mood: Option<Mood>,

        #[arg(long)]
        reflection: Option<String>,

        /// How mindful the day was, 1-10
        #[arg(long)]
        score: Option<String>,
    },
}

pub async fn run(ctx: &Context, action: SnapshotAction) -> Result<(), CliError> {
    ctx.enter(Route::Snapshots)?;
    let mut page = SnapshotsPage::new(&ctx.session);
    page.load().await?;

    match action {
        SnapshotAction::List => render::snapshots(&page.snapshots),
        SnapshotAction::Today => match &page.today {
            Some(today) => render::snapshot(today),
            None => render::done("No snapshot for today yet."),
        },
        SnapshotAction::Save {
            mood,
            reflection,
            score,
        } => {
            page.open_form();
            let form = &mut page.form.values;
            if mood.is_some() {
                form.mood = mood;
            }
            set(&mut form.reflection, reflection);
            set(&mut form.conscious_score, score);
            let snapshot = page.submit().await?;
            render::snapshot(&snapshot);
        }
    }
    Ok(())
}
