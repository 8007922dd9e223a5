use std::path::Path;

use anyhow::Result;
use icsync_core::{Orchestrator, SyncConfig, SyncOptions};

use crate::feeds::{self, FeedFailure};
use crate::render;

pub async fn run(config: &SyncConfig, ical_list: &Path) -> Result<()> {
    let urls = feeds::read_feed_list(ical_list)?;
    let source = feeds::collect(&urls, FeedFailure::Abort).await?;
    let (store, calendar_id) = super::open_calendar(config).await?;

    println!(
        "{}",
        render::render_plan("add", source.len(), &config.calendar_name)
    );

    let orchestrator = Orchestrator::new(&store, calendar_id, SyncOptions::default());
    let report = orchestrator.populate(&source).await;

    println!("{}", render::render_report(&report));
    Ok(())
}
