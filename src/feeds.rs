//! Feed list loading and download.

use std::path::Path;

use anyhow::{Context, Result};
use icsync_core::SourceCollection;
use tracing::{info, warn};

use crate::utils::tui;

/// Feed URLs from a list file: one per line, blank lines and `#` comments skipped.
pub fn read_feed_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        anyhow::bail!("Could not find feed list at {}", path.display());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed list {}", path.display()))?;

    Ok(parse_feed_list(&contents))
}

fn parse_feed_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// What to do when a feed cannot be downloaded or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFailure {
    /// Stop with an error. A partial feed set would look like deletions.
    Abort,
    /// Log and carry on with the remaining feeds.
    Skip,
}

/// Download every feed and gather its events.
pub async fn collect(urls: &[String], on_failure: FeedFailure) -> Result<SourceCollection> {
    let client = reqwest::Client::new();
    let mut collection = SourceCollection::new();

    for url in urls {
        let spinner = tui::create_spinner(format!("Fetching {}", url));
        let result = fetch(&client, url).await.and_then(|content| {
            collection
                .extend_from_feed(&content)
                .with_context(|| format!("Failed to parse {}", url))
        });
        spinner.finish_and_clear();

        match result {
            Ok(stats) => info!(feed = %url, events = stats.added, "Fetched feed"),
            Err(e) if on_failure == FeedFailure::Skip => {
                warn!(feed = %url, "Skipping feed: {:#}", e)
            }
            Err(e) => return Err(e),
        }
    }

    info!(events = collection.len(), feeds = urls.len(), "Collected feed events");
    Ok(collection)
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?
        .error_for_status()
        .with_context(|| format!("Feed server rejected {}", url))?
        .text()
        .await
        .with_context(|| format!("Failed to decode {}", url))
}
