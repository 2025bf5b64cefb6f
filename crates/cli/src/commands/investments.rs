//! `mledger investments ...`

use clap::{Args, Subcommand};
use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::{CrudPage, InvestmentProfiles};
use mindful_ledger_core::forms::InvestmentProfileForm;
use mindful_ledger_core::types::{InvestmentProfileId, InvestmentStrategy};

use super::{CliError, Context, set};
use crate::render;

#[derive(Subcommand)]
pub enum InvestmentAction {
    List,
    Add(InvestmentArgs),
    Edit {
        id: InvestmentProfileId,
        #[command(flatten)]
        fields: InvestmentArgs,
    },
    Delete { id: InvestmentProfileId },
}

#[derive(Args)]
pub struct InvestmentArgs {
    /// `conservative`, `balanced` or `long_term`
    #[arg(long)]
    strategy: Option<InvestmentStrategy>,

    #[arg(long)]
    monthly: Option<String>,

    /// Expected yearly return in percent, 0-100
    #[arg(long = "return")]
    expected_return: Option<String>,
}

impl InvestmentArgs {
    fn apply(self, form: &mut InvestmentProfileForm) {
        set(&mut form.strategy, self.strategy);
        set(&mut form.monthly_amount, self.monthly);
        set(&mut form.expected_return, self.expected_return);
    }
}

pub async fn run(ctx: &Context, action: InvestmentAction) -> Result<(), CliError> {
    ctx.enter(Route::InvestmentProfiles)?;
    let mut page: CrudPage<InvestmentProfiles> = CrudPage::new(&ctx.session);

    match action {
        InvestmentAction::List => {
            page.load().await?;
            render::investments(&page.items);
        }
        InvestmentAction::Add(fields) => {
            let profile = super::create(&mut page, |form| fields.apply(form)).await?;
            render::investment(&profile);
        }
        InvestmentAction::Edit { id, fields } => {
            let profile = super::update(&mut page, id, |form| fields.apply(form)).await?;
            render::investment(&profile);
        }
        InvestmentAction::Delete { id } => {
            super::delete(&mut page, id, &ctx.prompt()).await?;
        }
    }
    Ok(())
}
