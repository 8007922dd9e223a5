//! The destination calendar store, as seen by the orchestrator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::event::DestinationEvent;

/// One page of a destination listing.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<DestinationEvent>,
    pub next_page_token: Option<String>,
}

/// Result of asking the store to create an event.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(DestinationEvent),
    /// The store already holds an event with this identifier.
    AlreadyExists,
    Failed(SyncError),
}

/// A remote calendar service holding the mirrored events.
///
/// Calls are issued one at a time; implementations need not be `Sync`.
#[allow(async_fn_in_trait)]
pub trait DestinationStore {
    /// List events starting before `time_max` (all events when `None`).
    async fn list_events(
        &self,
        calendar_id: &str,
        page_token: Option<&str>,
        time_max: Option<DateTime<Utc>>,
    ) -> SyncResult<EventPage>;

    async fn create_event(&self, calendar_id: &str, event: &DestinationEvent) -> CreateOutcome;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &DestinationEvent,
    ) -> SyncResult<()>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> SyncResult<()>;

    /// Id of the calendar titled `summary`, if the account has one.
    async fn find_calendar(&self, summary: &str) -> SyncResult<Option<String>>;

    /// Create a calendar and return its id.
    async fn create_calendar(&self, summary: &str, time_zone: &str) -> SyncResult<String>;
}

/// Every destination event visible before `time_max`, keyed by id.
///
/// Follows continuation tokens until the store reports none left.
pub async fn fetch_all<S: DestinationStore>(
    store: &S,
    calendar_id: &str,
    time_max: Option<DateTime<Utc>>,
) -> SyncResult<HashMap<String, DestinationEvent>> {
    let mut events = HashMap::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store
            .list_events(calendar_id, page_token.as_deref(), time_max)
            .await?;
        pages += 1;

        for event in page.events {
            events.insert(event.id.clone(), event);
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    debug!(pages, events = events.len(), "Listed destination events");
    Ok(events)
}

/// In-memory store for tests.
#[cfg(test)]
pub(crate) mod memory {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashSet};

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        pub events: RefCell<BTreeMap<String, DestinationEvent>>,
        pub calendars: RefCell<Vec<(String, String)>>,
        pub page_size: usize,
        pub fail_create: HashSet<String>,
        pub fail_update: HashSet<String>,
        pub fail_delete: HashSet<String>,
        pub fail_list: bool,
        pub calls: RefCell<Vec<String>>,
    }

    impl MemoryStore {
        pub fn with_events(events: impl IntoIterator<Item = DestinationEvent>) -> Self {
            MemoryStore {
                events: RefCell::new(events.into_iter().map(|e| (e.id.clone(), e)).collect()),
                page_size: 2,
                ..Default::default()
            }
        }

        pub fn get(&self, id: &str) -> Option<DestinationEvent> {
            self.events.borrow().get(id).cloned()
        }
    }

    impl DestinationStore for MemoryStore {
        async fn list_events(
            &self,
            _calendar_id: &str,
            page_token: Option<&str>,
            time_max: Option<DateTime<Utc>>,
        ) -> SyncResult<EventPage> {
            self.calls.borrow_mut().push("list".to_string());
            if self.fail_list {
                return Err(SyncError::Store("listing unavailable".to_string()));
            }

            let visible: Vec<DestinationEvent> = self
                .events
                .borrow()
                .values()
                .filter(|e| match (time_max, e.start.instant("start")) {
                    (Some(max), Ok(start)) => start < max,
                    _ => true,
                })
                .cloned()
                .collect();

            let offset: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
            let page_size = self.page_size.max(1);
            let end = (offset + page_size).min(visible.len());
            let next_page_token = (end < visible.len()).then(|| end.to_string());

            Ok(EventPage {
                events: visible[offset..end].to_vec(),
                next_page_token,
            })
        }

        async fn create_event(&self, _calendar_id: &str, event: &DestinationEvent) -> CreateOutcome {
            self.calls.borrow_mut().push(format!("create {}", event.id));
            if self.fail_create.contains(&event.id) {
                return CreateOutcome::Failed(SyncError::Store("create rejected".to_string()));
            }
            if self.events.borrow().contains_key(&event.id) {
                return CreateOutcome::AlreadyExists;
            }
            self.events
                .borrow_mut()
                .insert(event.id.clone(), event.clone());
            CreateOutcome::Created(event.clone())
        }

        async fn update_event(
            &self,
            _calendar_id: &str,
            event_id: &str,
            event: &DestinationEvent,
        ) -> SyncResult<()> {
            self.calls.borrow_mut().push(format!("update {}", event_id));
            if self.fail_update.contains(event_id) {
                return Err(SyncError::Store("update rejected".to_string()));
            }
            self.events
                .borrow_mut()
                .insert(event_id.to_string(), event.clone());
            Ok(())
        }

        async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> SyncResult<()> {
            self.calls.borrow_mut().push(format!("delete {}", event_id));
            if self.fail_delete.contains(event_id) {
                return Err(SyncError::Store("delete rejected".to_string()));
            }
            self.events.borrow_mut().remove(event_id);
            Ok(())
        }

        async fn find_calendar(&self, summary: &str) -> SyncResult<Option<String>> {
            Ok(self
                .calendars
                .borrow()
                .iter()
                .find(|(_, s)| s == summary)
                .map(|(id, _)| id.clone()))
        }

        async fn create_calendar(&self, summary: &str, _time_zone: &str) -> SyncResult<String> {
            let id = format!("cal{}", self.calendars.borrow().len() + 1);
            self.calendars
                .borrow_mut()
                .push((id.clone(), summary.to_string()));
            Ok(id)
        }
    }
}
