use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::DashboardPage;

use super::{CliError, Context};
use crate::render;

pub async fn run(ctx: &Context) -> Result<(), CliError> {
    ctx.enter(Route::Dashboard)?;
    let mut page = DashboardPage::new(&ctx.session);
    let summary = page.load().await?;
    let greeting = ctx.session.profile().and_then(|p| p.first_name());
    render::dashboard(summary, greeting);
    Ok(())
}
