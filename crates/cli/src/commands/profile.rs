//! `mledger profile ...`

use clap::{Args, Subcommand};
use mindful_ledger_client::guard::Route;
use mindful_ledger_client::pages::ProfilePage;
use mindful_ledger_core::forms::{PasswordForm, ProfileForm};
use mindful_ledger_core::types::Language;

use super::{CliError, Context, set};
use crate::render;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the account profile
    Show,
    /// Change profile fields; omitted fields stay as they are
    Update(ProfileArgs),
    /// Change the password
    Password {
        #[arg(long, env = "MINDFUL_PASSWORD", hide_env_values = true)]
        current: String,

        #[arg(long = "new", env = "MINDFUL_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    /// `YYYY-MM-DD`
    #[arg(long)]
    birth_date: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    avatar_url: Option<String>,

    #[arg(long)]
    language: Option<Language>,

    #[arg(long)]
    timezone: Option<String>,
}

impl ProfileArgs {
    fn apply(self, form: &mut ProfileForm) {
        set(&mut form.first_name, self.first_name);
        set(&mut form.last_name, self.last_name);
        set(&mut form.phone, self.phone);
        set(&mut form.birth_date, self.birth_date);
        set(&mut form.country, self.country);
        set(&mut form.avatar_url, self.avatar_url);
        if self.language.is_some() {
            form.language = self.language;
        }
        set(&mut form.timezone, self.timezone);
    }
}

pub async fn run(ctx: &mut Context, action: ProfileAction) -> Result<(), CliError> {
    ctx.enter(Route::Profile)?;
    let mut page = ProfilePage::new(&ctx.session);

    match action {
        ProfileAction::Show => {
            if ctx.session.profile().is_none() {
                ctx.session.refresh_profile().await?;
            }
            if let Some(profile) = ctx.session.profile() {
                render::profile(profile);
            }
        }
        ProfileAction::Update(fields) => {
            fields.apply(&mut page.profile.values);
            page.submit_profile(&mut ctx.session).await?;
            if let Some(profile) = ctx.session.profile() {
                render::profile(profile);
            }
        }
        ProfileAction::Password {
            current,
            new_password,
        } => {
            page.password.values = PasswordForm {
                current_password: current,
                new_password,
            };
            page.submit_password(&ctx.session).await?;
        }
    }
    if let Some(notice) = &page.notice {
        render::done(notice);
    }
    Ok(())
}
