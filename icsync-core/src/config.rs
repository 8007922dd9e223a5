//! Sync settings.
//!
//! Loaded from `~/.config/icsync/config.toml` when it exists, with `ICSYNC_*`
//! environment variables layered on top. The CLI applies its flags last.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{SyncError, SyncResult};
use crate::reconcile::ForceSync;

static DEFAULT_CALENDAR_NAME: &str = "Integrated Calendar";
static DEFAULT_TIME_ZONE: &str = "America/New_York";
static DEFAULT_CALENDAR_ID_FILE: &str = "calendar_id.txt";

fn default_calendar_name() -> String {
    DEFAULT_CALENDAR_NAME.to_string()
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_calendar_id_file() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_ID_FILE)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Title of the destination calendar, used to find or create it.
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    /// Zone given to a newly created destination calendar.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    #[serde(default = "default_calendar_id_file")]
    pub calendar_id_file: PathBuf,

    /// RFC 3339 instant, or a duration from now such as "90days".
    #[serde(default)]
    pub horizon: Option<String>,

    #[serde(default)]
    pub force_sync: ForceSync,

    #[serde(default)]
    pub google_account: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            calendar_name: default_calendar_name(),
            time_zone: default_time_zone(),
            calendar_id_file: default_calendar_id_file(),
            horizon: None,
            force_sync: ForceSync::Off,
            google_account: None,
        }
    }
}

impl SyncConfig {
    pub fn config_path() -> SyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SyncError::Config("Could not determine config directory".into()))?
            .join("icsync");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> SyncResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (optional) and the environment.
    pub fn load_from(path: &Path) -> SyncResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("ICSYNC"))
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SyncError::Config(e.to_string()))
    }

    /// The calendar-id file with `~` expanded.
    pub fn calendar_id_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.calendar_id_file.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// The listing window end, resolved against `now`.
    pub fn horizon(&self, now: DateTime<Utc>) -> SyncResult<Option<DateTime<Utc>>> {
        self.horizon
            .as_deref()
            .map(|value| parse_horizon(value, now))
            .transpose()
    }
}

/// Parse an RFC 3339 instant, falling back to a humantime duration from `now`.
pub fn parse_horizon(value: &str, now: DateTime<Utc>) -> SyncResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let duration = humantime::parse_duration(value).map_err(|e| {
        SyncError::Config(format!(
            "Invalid horizon '{}': expected an RFC 3339 instant or a duration ({})",
            value, e
        ))
    })?;

    let delta = chrono::Duration::from_std(duration)
        .map_err(|e| SyncError::Config(format!("Horizon '{}' is out of range: {}", value, e)))?;

    Ok(now + delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.calendar_name, "Integrated Calendar");
        assert_eq!(config.time_zone, "America/New_York");
        assert_eq!(config.calendar_id_file, PathBuf::from("calendar_id.txt"));
        assert_eq!(config.force_sync, ForceSync::Off);
        assert!(config.horizon.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
calendar_name = "DCPPC Calendar"
horizon = "2018-11-01T00:00:00Z"
force_sync = "full-patch"
google_account = "me@example.com"
"#,
        )
        .unwrap();

        let config = SyncConfig::load_from(&path).unwrap();
        assert_eq!(config.calendar_name, "DCPPC Calendar");
        assert_eq!(config.force_sync, ForceSync::FullPatch);
        assert_eq!(config.google_account.as_deref(), Some("me@example.com"));
        assert_eq!(config.time_zone, "America/New_York");

        let now = Utc::now();
        assert_eq!(
            config.horizon(now).unwrap(),
            Some(Utc.with_ymd_and_hms(2018, 11, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_force_sync_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "force_sync = \"sometimes\"\n").unwrap();

        assert!(matches!(
            SyncConfig::load_from(&path),
            Err(SyncError::Config(_))
        ));
    }

    #[test]
    fn test_parse_horizon_duration() {
        let now = Utc.with_ymd_and_hms(2018, 10, 1, 0, 0, 0).unwrap();
        assert_eq!(
            parse_horizon("31days", now).unwrap(),
            Utc.with_ymd_and_hms(2018, 11, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_horizon_offset_instant() {
        let now = Utc::now();
        assert_eq!(
            parse_horizon("2018-10-31T20:00:00-04:00", now).unwrap(),
            Utc.with_ymd_and_hms(2018, 11, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_horizon_rejects_garbage() {
        assert!(matches!(
            parse_horizon("next tuesday", Utc::now()),
            Err(SyncError::Config(_))
        ));
    }

    #[test]
    fn test_calendar_id_path_expands_tilde() {
        let config = SyncConfig {
            calendar_id_file: PathBuf::from("~/icsync/calendar_id.txt"),
            ..Default::default()
        };
        let path = config.calendar_id_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("icsync/calendar_id.txt"));
    }
}
