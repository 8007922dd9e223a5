//! Google Calendar implementation of the destination store.

use chrono::{DateTime, Utc};
use google_calendar::Client;
use google_calendar::types::{MinAccessRole, OrderBy, SendUpdates};
use icsync_core::{
    CreateOutcome, DestinationEvent, DestinationStore, EventPage, SyncError, SyncResult,
};
use tracing::debug;

use crate::google_event::{FromGoogle, ToGoogle};
use crate::session::Session;

pub struct GoogleStore {
    client: Client,
}

impl GoogleStore {
    /// Build a store from the saved session of `account_email`.
    pub async fn connect(account_email: &str) -> SyncResult<Self> {
        let session = Session::load_valid(account_email)
            .await
            .map_err(|e| SyncError::Setup(format!("{:#}", e)))?;
        let client = session
            .client()
            .map_err(|e| SyncError::Setup(format!("{:#}", e)))?;

        Ok(GoogleStore { client })
    }
}

impl DestinationStore for GoogleStore {
    /// Google pages internally, so the whole listing comes back as one page.
    async fn list_events(
        &self,
        calendar_id: &str,
        _page_token: Option<&str>,
        time_max: Option<DateTime<Utc>>,
    ) -> SyncResult<EventPage> {
        let time_max = time_max.map(|t| t.to_rfc3339()).unwrap_or_default();

        let response = self
            .client
            .events()
            .list_all(
                calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false,
                false,
                false,
                &time_max,
                "",
                "",
                "",
            )
            .await
            .map_err(|e| SyncError::Store(format!("Failed to list events: {}", e)))?;

        let events: Vec<DestinationEvent> = response
            .body
            .into_iter()
            .filter(|e| e.status != "cancelled" && !e.id.is_empty())
            .map(DestinationEvent::from_google)
            .collect();

        debug!(calendar = calendar_id, events = events.len(), "Listed Google events");

        Ok(EventPage {
            events,
            next_page_token: None,
        })
    }

    async fn create_event(&self, calendar_id: &str, event: &DestinationEvent) -> CreateOutcome {
        let result = self
            .client
            .events()
            .insert(
                calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &event.to_google(),
            )
            .await;

        match result {
            Ok(response) => CreateOutcome::Created(DestinationEvent::from_google(response.body)),
            Err(e) if is_conflict(&e.to_string()) => CreateOutcome::AlreadyExists,
            Err(e) => CreateOutcome::Failed(SyncError::Store(format!(
                "Failed to create event {}: {}",
                event.id, e
            ))),
        }
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &DestinationEvent,
    ) -> SyncResult<()> {
        self.client
            .events()
            .update(
                calendar_id,
                event_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &event.to_google(),
            )
            .await
            .map_err(|e| SyncError::Store(format!("Failed to update event {}: {}", event_id, e)))?;

        Ok(())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> SyncResult<()> {
        let result = self
            .client
            .events()
            .delete(calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("410") || error_str.contains("Gone") {
                    debug!(id = event_id, "Event already deleted");
                    Ok(())
                } else {
                    Err(SyncError::Store(format!(
                        "Failed to delete event {}: {}",
                        event_id, error_str
                    )))
                }
            }
        }
    }

    async fn find_calendar(&self, summary: &str) -> SyncResult<Option<String>> {
        let response = self
            .client
            .calendar_list()
            .list_all(MinAccessRole::default(), false, false)
            .await
            .map_err(|e| SyncError::Store(format!("Failed to fetch calendars: {}", e)))?;

        Ok(response
            .body
            .into_iter()
            .find(|c| !c.id.is_empty() && c.summary == summary)
            .map(|c| c.id))
    }

    async fn create_calendar(&self, summary: &str, time_zone: &str) -> SyncResult<String> {
        let calendar = new_calendar(summary, time_zone);

        let response = self
            .client
            .calendars()
            .insert(&calendar)
            .await
            .map_err(|e| SyncError::Store(format!("Failed to create calendar: {}", e)))?;

        Ok(response.body.id)
    }
}

/// A calendar resource for insertion; Google fills in id, etag and kind.
fn new_calendar(summary: &str, time_zone: &str) -> google_calendar::types::Calendar {
    google_calendar::types::Calendar {
        conference_properties: None,
        description: String::new(),
        etag: String::new(),
        id: String::new(),
        kind: String::new(),
        location: String::new(),
        summary: summary.to_string(),
        time_zone: time_zone.to_string(),
    }
}

/// Google answers 409 when an event id is already taken.
fn is_conflict(error: &str) -> bool {
    error.contains("409") || error.to_lowercase().contains("duplicate")
}
