mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use daybook_core::{DaybookConfig, StoreContext, StoreHandle};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Browse and edit your daybook events")]
struct Cli {
    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every event, ordered by start time
    Events,
    /// Show a day hour by hour
    Day {
        /// Day to show (YYYY-MM-DD, defaults to today)
        date: Option<String>,
    },
    /// Show a month grid
    Month {
        /// Month to show (YYYY-MM, defaults to the current month)
        month: Option<String>,
    },
    /// List the next events
    Upcoming {
        /// How many events to show
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Create an event
    New {
        title: String,

        /// Start date/time (e.g., "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time (defaults to one hour after the start)
        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Minutes before the start to be reminded
        #[arg(short, long)]
        reminder: Option<u32>,

        /// Mark the event as lasting all day
        #[arg(long)]
        all_day: bool,
    },
    /// Change fields of an existing event
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        /// New location (pass "" to clear it)
        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Minutes before the start to be reminded (0 clears it)
        #[arg(short, long)]
        reminder: Option<u32>,
    },
    /// Delete an event
    Delete { id: String },
    /// Show configuration paths and effective settings
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => DaybookConfig::config_path()?,
    };

    if let Commands::Config { init } = cli.command {
        return commands::config::run(&config_path, init);
    }

    let config = DaybookConfig::load_from(&config_path)?;
    let context = StoreContext::mount_with_config(&config).await?;
    let store = context.handle();
    warn_if_degraded(&store)?;

    match cli.command {
        Commands::Events => commands::events::run(&store),
        Commands::Day { date } => commands::day::run(&store, date.as_deref()),
        Commands::Month { month } => commands::month::run(&store, month.as_deref()),
        Commands::Upcoming { count } => {
            commands::upcoming::run(&store, count.unwrap_or(config.upcoming_count))
        }
        Commands::New {
            title,
            start,
            end,
            location,
            description,
            reminder,
            all_day,
        } => {
            let args = commands::new::NewArgs {
                title,
                start,
                end,
                location,
                description,
                reminder,
                all_day,
            };
            commands::new::run(&store, args).await
        }
        Commands::Edit {
            id,
            title,
            start,
            end,
            location,
            description,
            reminder,
        } => {
            let changes = commands::edit::Changes {
                title,
                start,
                end,
                location,
                description,
                reminder,
            };
            commands::edit::run(&store, &id, changes).await
        }
        Commands::Delete { id } => commands::delete::run(&store, &id).await,
        Commands::Config { .. } => unreachable!("handled before mounting the store"),
    }
}

fn warn_if_degraded(store: &StoreHandle) -> Result<()> {
    if store.is_degraded()? {
        let reason = store.error()?.unwrap_or_default();
        eprintln!("{}", format!("warning: {reason}").yellow());
        eprintln!(
            "{}",
            "Changes are kept for this session only.".yellow().dimmed()
        );
        eprintln!();
    }
    Ok(())
}
