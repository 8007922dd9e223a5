use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use icsync_core::{Orchestrator, SyncConfig, SyncOptions};

use crate::feeds::{self, FeedFailure};
use crate::render;

pub async fn run(config: &SyncConfig, ical_list: &Path) -> Result<()> {
    let urls = feeds::read_feed_list(ical_list)?;
    let options = SyncOptions {
        force_sync: config.force_sync,
        horizon: config.horizon(Utc::now())?,
    };
    let source = feeds::collect(&urls, FeedFailure::Abort).await?;
    let (store, calendar_id) = super::open_calendar(config).await?;

    println!(
        "{}",
        render::render_plan("update", source.len(), &config.calendar_name)
    );

    let report = Orchestrator::new(&store, calendar_id, options)
        .run(&source)
        .await
        .context("Sync aborted before any change was made")?;

    println!("{}", render::render_report(&report));
    Ok(())
}
