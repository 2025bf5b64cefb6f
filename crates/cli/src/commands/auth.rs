//! Login, registration and logout.

use clap::Subcommand;
use mindful_ledger_client::pages::{LoginPage, RegisterPage};
use mindful_ledger_core::types::Language;

use super::{CliError, Context};
use crate::render;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MINDFUL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MINDFUL_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// IANA timezone, e.g. `Europe/Madrid`
        #[arg(long)]
        timezone: String,

        /// `es` or `en`
        #[arg(long)]
        language: Option<Language>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
}

pub async fn run(ctx: &mut Context, action: AuthAction) -> Result<(), CliError> {
    match action {
        AuthAction::Login { email, password } => {
            let mut page = LoginPage::new();
            page.form.values.email = email;
            page.form.values.password = password;
            page.submit(&mut ctx.session).await?;
            whoami(ctx)
        }
        AuthAction::Register {
            email,
            password,
            first_name,
            last_name,
            timezone,
            language,
        } => {
            let mut page = RegisterPage::new();
            let form = &mut page.form.values;
            form.email = email;
            form.password = password;
            form.first_name = first_name;
            form.last_name = last_name;
            form.timezone = timezone;
            form.language = language;
            page.submit(&mut ctx.session).await?;
            whoami(ctx)
        }
        AuthAction::Logout => {
            ctx.session.logout();
            render::done("Logged out.");
            Ok(())
        }
        AuthAction::Whoami => whoami(ctx),
    }
}

fn whoami(ctx: &Context) -> Result<(), CliError> {
    let user = ctx.session.user().ok_or(CliError::NotLoggedIn)?;
    render::user(user, ctx.session.profile());
    Ok(())
}
