//! The persisted destination calendar id, and how a run arrives at one.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{SyncError, SyncResult};
use crate::store::DestinationStore;

/// A single-line file holding the destination calendar id.
#[derive(Debug, Clone)]
pub struct CalendarIdFile {
    path: PathBuf,
}

impl CalendarIdFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CalendarIdFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored id, or `None` when the file does not exist.
    ///
    /// A file that exists but holds nothing is a setup error.
    pub fn load(&self) -> SyncResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let id = contents.lines().next().map(str::trim).unwrap_or_default();

        if id.is_empty() {
            return Err(SyncError::Setup(format!(
                "Calendar id file {} is empty",
                self.path.display()
            )));
        }

        Ok(Some(id.to_string()))
    }

    pub fn save(&self, calendar_id: &str) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, format!("{}\n", calendar_id))?;
        Ok(())
    }
}

/// Find the destination calendar: stored id first, then a calendar titled
/// `name`, then a freshly created one. The id is saved when it was not
/// already stored.
pub async fn resolve_calendar<S: DestinationStore>(
    store: &S,
    id_file: &CalendarIdFile,
    name: &str,
    time_zone: &str,
) -> SyncResult<String> {
    if let Some(id) = id_file.load()? {
        info!(calendar = %id, path = %id_file.path().display(), "Using stored calendar id");
        return Ok(id);
    }

    let id = match store.find_calendar(name).await? {
        Some(id) => {
            info!(calendar = %id, name, "Found existing calendar");
            id
        }
        None => {
            let id = store.create_calendar(name, time_zone).await?;
            info!(calendar = %id, name, time_zone, "Created calendar");
            id
        }
    };

    id_file.save(&id)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = CalendarIdFile::new(dir.path().join("calendar_id.txt"));
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = CalendarIdFile::new(dir.path().join("nested/calendar_id.txt"));

        file.save("abc123@group.calendar.google.com").unwrap();
        assert_eq!(
            file.load().unwrap().as_deref(),
            Some("abc123@group.calendar.google.com")
        );
    }

    #[test]
    fn test_empty_file_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar_id.txt");
        std::fs::write(&path, "\n").unwrap();

        let result = CalendarIdFile::new(path).load();
        assert!(matches!(result, Err(SyncError::Setup(_))));
    }

    #[tokio::test]
    async fn test_resolve_prefers_stored_id() {
        let dir = tempfile::tempdir().unwrap();
        let file = CalendarIdFile::new(dir.path().join("calendar_id.txt"));
        file.save("stored").unwrap();
        let store = MemoryStore::default();

        let id = resolve_calendar(&store, &file, "Integrated Calendar", "UTC")
            .await
            .unwrap();
        assert_eq!(id, "stored");
        assert!(store.calendars.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_finds_calendar_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = CalendarIdFile::new(dir.path().join("calendar_id.txt"));
        let store = MemoryStore::default();
        store
            .calendars
            .borrow_mut()
            .push(("existing".to_string(), "Integrated Calendar".to_string()));

        let id = resolve_calendar(&store, &file, "Integrated Calendar", "UTC")
            .await
            .unwrap();
        assert_eq!(id, "existing");
        assert_eq!(file.load().unwrap().as_deref(), Some("existing"));
    }

    #[tokio::test]
    async fn test_resolve_creates_missing_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let file = CalendarIdFile::new(dir.path().join("calendar_id.txt"));
        let store = MemoryStore::default();

        let id = resolve_calendar(&store, &file, "Integrated Calendar", "America/New_York")
            .await
            .unwrap();
        assert_eq!(id, "cal1");
        assert_eq!(store.calendars.borrow().len(), 1);
        assert_eq!(file.load().unwrap().as_deref(), Some("cal1"));
    }
}
