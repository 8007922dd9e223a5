pub mod create;
pub mod merge;
pub mod update;

use anyhow::{Context, Result};
use icsync_core::{CalendarIdFile, SyncConfig, resolve_calendar};
use icsync_provider_google::GoogleStore;

/// Connect to Google and find (or create) the destination calendar.
async fn open_calendar(config: &SyncConfig) -> Result<(GoogleStore, String)> {
    let Some(account) = config.google_account.as_deref() else {
        anyhow::bail!(
            "No Google account configured.\n\n\
            Pass --account, or set google_account in {}",
            SyncConfig::config_path()?.display()
        );
    };

    let store = GoogleStore::connect(account)
        .await
        .with_context(|| format!("Failed to connect to Google as {}", account))?;

    let id_file = CalendarIdFile::new(config.calendar_id_path());
    let calendar_id = resolve_calendar(&store, &id_file, &config.calendar_name, &config.time_zone)
        .await
        .with_context(|| format!("Failed to resolve calendar '{}'", config.calendar_name))?;

    Ok((store, calendar_id))
}
