//! Mindful Ledger CLI - personal finance and habits from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in MINDFUL_STATE_DIR)
//! mledger login -e ana@example.com -p 'correct horse'
//!
//! # Overview
//! mledger dashboard
//!
//! # Record an expense
//! mledger transactions add --amount 12.50 --type expense --emotion impulse
//!
//! # Put money aside
//! mledger goals deposit 6f1c2e0a-5d55-4a4e-9b0f-1f7b2a3c4d5e 50
//! ```
//!
//! # Environment Variables
//!
//! - `MINDFUL_API_URL` - API base URL (default `http://localhost:3000/api`)
//! - `MINDFUL_STATE_DIR` - where the session is stored
//! - `MINDFUL_LOG_FORMAT` - `json` for JSON logs
//! - `RUST_LOG` - log filter (default `mindful_ledger=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::{
    AuthAction, CategoryAction, CliError, Context, GoalAction, HabitAction, InvestmentAction,
    ProfileAction, SnapshotAction, TransactionAction,
};

#[derive(Parser)]
#[command(name = "mledger")]
#[command(author, version, about = "Mindful Ledger: money, habits and mood")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Auth(AuthAction),
    /// Totals, monthly series and previews
    Dashboard,
    /// Income and expenses
    #[command(alias = "tx")]
    Transactions {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Saving goals and deposits
    Goals {
        #[command(subcommand)]
        action: GoalAction,
    },
    /// Habits and their logs
    Habits {
        #[command(subcommand)]
        action: HabitAction,
    },
    /// Daily mood snapshots
    Snapshots {
        #[command(subcommand)]
        action: SnapshotAction,
    },
    /// Transaction categories (admin)
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Investment profiles
    Investments {
        #[command(subcommand)]
        action: InvestmentAction,
    },
    /// Account details and password
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mindful_ledger=info,mledger=info".into());

    let is_json = std::env::var("MINDFUL_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut ctx = Context::start(cli.yes).await?;

    match cli.command {
        Commands::Auth(action) => commands::auth::run(&mut ctx, action).await,
        Commands::Dashboard => commands::dashboard::run(&ctx).await,
        Commands::Transactions { action } => commands::transactions::run(&ctx, action).await,
        Commands::Goals { action } => commands::goals::run(&ctx, action).await,
        Commands::Habits { action } => commands::habits::run(&ctx, action).await,
        Commands::Snapshots { action } => commands::snapshots::run(&ctx, action).await,
        Commands::Categories { action } => commands::categories::run(&ctx, action).await,
        Commands::Investments { action } => commands::investments::run(&ctx, action).await,
        Commands::Profile { action } => commands::profile::run(&mut ctx, action).await,
    }
}
