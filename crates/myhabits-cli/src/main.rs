use clap::{Parser, Subcommand};

mod commands;
mod common;

use common::Context;
use myhabits_core::Session;

#[derive(Parser)]
#[command(name = "myhabits", version, about = "myhabits CLI")]
struct Cli {
    /// Treat this day (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, log in, log out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Today's due habits and outcomes
    Today {
        #[command(subcommand)]
        action: commands::today::TodayAction,
    },
    /// Completion statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Route a store-backed command. Returns the session the command left behind.
fn dispatch(
    ctx: &Context,
    session: Session,
    command: Commands,
) -> Result<Session, Box<dyn std::error::Error>> {
    match command {
        Commands::Auth { action } => commands::auth::run(ctx, session, action),
        Commands::Habit { action } => commands::habit::run(ctx, session, action),
        Commands::Today { action } => commands::today::run(ctx, session, action),
        Commands::Stats { action } => commands::stats::run(ctx, session, action),
        Commands::Config { .. } => Ok(session),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (config, load_error) = match myhabits_core::Config::load() {
        Ok(config) => (config, None),
        Err(e) => (myhabits_core::Config::default(), Some(e)),
    };
    init_tracing(&config.log.level);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "config unavailable, using defaults");
    }

    match cli.command {
        Commands::Config { action } => commands::config::run(action, config),
        command => {
            let ctx = Context::open(config, cli.date.as_deref())?;
            let session = ctx.restore_session()?;
            tracing::debug!(logged_in = session.is_logged_in(), today = %ctx.today, "context ready");

            let session = dispatch(&ctx, session, command)?;
            tracing::debug!(logged_in = session.is_logged_in(), "command finished");
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
