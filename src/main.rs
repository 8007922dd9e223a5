mod commands;
mod feeds;
mod logging;
mod render;
mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use icsync_core::{ForceSync, SyncConfig};

#[derive(Parser)]
#[command(name = "icsync")]
#[command(about = "Mirror a set of iCalendar feeds into one Google calendar")]
struct Cli {
    /// Log filter, e.g. "debug" or "icsync_core=debug" (defaults to RUST_LOG, then "info")
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Config file (defaults to ~/.config/icsync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the calendar if needed and add every feed event to it
    Create {
        /// File listing one feed URL per line
        #[arg(short, long)]
        ical_list: PathBuf,

        /// Calendar title
        #[arg(short, long)]
        name: Option<String>,

        /// Google account that owns the calendar
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Add, remove and update events so the calendar matches the feeds
    Update {
        /// File listing one feed URL per line
        #[arg(short, long)]
        ical_list: PathBuf,

        /// Calendar title
        #[arg(short, long)]
        name: Option<String>,

        /// Google account that owns the calendar
        #[arg(short, long)]
        account: Option<String>,

        /// Rewrite events even when nothing changed: off, empty-patch or full-patch
        #[arg(long)]
        force_sync: Option<ForceSync>,
    },
    /// Write all feed events into a single .ics file
    Merge {
        /// File listing one feed URL per line
        #[arg(short, long)]
        ical_list: PathBuf,

        /// Where to write the merged calendar
        #[arg(short, long)]
        output: PathBuf,

        /// Calendar title
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Create {
            ical_list,
            name,
            account,
        } => {
            apply_overrides(&mut config, name, account);
            commands::create::run(&config, &ical_list).await
        }
        Commands::Update {
            ical_list,
            name,
            account,
            force_sync,
        } => {
            apply_overrides(&mut config, name, account);
            if let Some(force_sync) = force_sync {
                config.force_sync = force_sync;
            }
            commands::update::run(&config, &ical_list).await
        }
        Commands::Merge {
            ical_list,
            output,
            name,
        } => {
            apply_overrides(&mut config, name, None);
            commands::merge::run(&config, &ical_list, &output).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    let config = match path {
        Some(path) => SyncConfig::load_from(path),
        None => SyncConfig::load(),
    };
    config.context("Failed to load configuration")
}

fn apply_overrides(config: &mut SyncConfig, name: Option<String>, account: Option<String>) {
    if let Some(name) = name {
        config.calendar_name = name;
    }
    if let Some(account) = account {
        config.google_account = Some(account);
    }
}
