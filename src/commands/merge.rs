use std::path::Path;

use anyhow::{Context, Result};
use icsync_core::SyncConfig;
use icsync_core::ics::generate_merged_calendar;
use owo_colors::OwoColorize;

use crate::feeds::{self, FeedFailure};

pub async fn run(config: &SyncConfig, ical_list: &Path, output: &Path) -> Result<()> {
    let urls = feeds::read_feed_list(ical_list)?;
    let source = feeds::collect(&urls, FeedFailure::Skip).await?;

    let ics = generate_merged_calendar(&config.calendar_name, source.events());

    std::fs::write(output, ics)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} events to {}",
        "Wrote".green(),
        source.len(),
        output.display()
    );
    Ok(())
}
