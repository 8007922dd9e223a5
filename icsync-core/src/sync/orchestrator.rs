//! Drives add/remove/update calls for one destination calendar.
//!
//! Every store call is guarded on its own: a failure is logged, recorded in
//! the report, and the run moves on to the next event. Nothing is rolled back.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::collection::SourceCollection;
use crate::diff::diff;
use crate::error::SyncResult;
use crate::event::{DestinationEvent, SourceEvent};
use crate::reconcile::{ForceSync, reconcile};
use crate::store::{CreateOutcome, DestinationStore, fetch_all};
use crate::sync::{FailedEvent, SyncReport};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub force_sync: ForceSync,
    /// Only destination events starting before this instant take part in the diff.
    pub horizon: Option<DateTime<Utc>>,
}

pub struct Orchestrator<'a, S> {
    store: &'a S,
    calendar_id: String,
    options: SyncOptions,
}

impl<'a, S: DestinationStore> Orchestrator<'a, S> {
    pub fn new(store: &'a S, calendar_id: impl Into<String>, options: SyncOptions) -> Self {
        Orchestrator {
            store,
            calendar_id: calendar_id.into(),
            options,
        }
    }

    /// Bring the destination calendar in line with `source`.
    ///
    /// Only a failure to list the destination is returned as an error; it
    /// happens before any mutation. Per-event failures end up in the report.
    pub async fn run(&self, source: &SourceCollection) -> SyncResult<SyncReport> {
        info!(calendar = %self.calendar_id, "Listing destination events");
        let dest = fetch_all(self.store, &self.calendar_id, self.options.horizon).await?;

        let dest_ids = dest.keys().cloned().collect();
        let plan = diff(&source.ids(), &dest_ids);

        info!(
            add = plan.add.len(),
            remove = plan.remove.len(),
            sync = plan.sync.len(),
            "Computed diff"
        );

        let mut report = SyncReport::default();

        info!("Adding {} events", plan.add.len());
        for id in sorted(&plan.add) {
            if let Some(event) = source.get(id) {
                self.add(event, &mut report).await;
            }
        }

        info!("Removing {} events", plan.remove.len());
        for id in sorted(&plan.remove) {
            if let Some(event) = dest.get(id) {
                self.remove(event, &mut report).await;
            }
        }

        info!("Syncing {} events", plan.sync.len());
        for id in sorted(&plan.sync) {
            if let (Some(dest_event), Some(source_event)) = (dest.get(id), source.get(id)) {
                self.sync(dest_event, source_event, &mut report).await;
            }
        }

        log_summary(&report);
        Ok(report)
    }

    /// Create every event of `source` without looking at the destination first.
    pub async fn populate(&self, source: &SourceCollection) -> SyncReport {
        info!(
            calendar = %self.calendar_id,
            "Populating calendar with {} events",
            source.len()
        );

        let mut events: Vec<&SourceEvent> = source.events().collect();
        events.sort_by(|a, b| a.id.cmp(&b.id));

        let mut report = SyncReport::default();
        for event in events {
            self.add(event, &mut report).await;
        }

        log_summary(&report);
        report
    }

    async fn add(&self, event: &SourceEvent, report: &mut SyncReport) {
        let new_event = DestinationEvent::from(event);

        match self.store.create_event(&self.calendar_id, &new_event).await {
            CreateOutcome::Created(created) => {
                info!(id = %created.id, title = %created.summary, "Created event");
                report.added += 1;
            }
            CreateOutcome::AlreadyExists => {
                warn!(id = %event.id, title = %event.summary, "Event already exists, continuing");
                report.already_exists.push(FailedEvent::new(
                    &event.id,
                    &event.summary,
                    "already exists",
                ));
            }
            CreateOutcome::Failed(e) => {
                error!(id = %event.id, title = %event.summary, "Could not create event: {}", e);
                report
                    .add_failures
                    .push(FailedEvent::new(&event.id, &event.summary, e));
            }
        }
    }

    async fn remove(&self, event: &DestinationEvent, report: &mut SyncReport) {
        match self.store.delete_event(&self.calendar_id, &event.id).await {
            Ok(()) => {
                info!(id = %event.id, title = %event.summary, "Deleted event");
                report.removed += 1;
            }
            Err(e) => {
                error!(id = %event.id, title = %event.summary, "Could not delete event: {}", e);
                report
                    .remove_failures
                    .push(FailedEvent::new(&event.id, &event.summary, e));
            }
        }
    }

    async fn sync(&self, dest: &DestinationEvent, source: &SourceEvent, report: &mut SyncReport) {
        let result = reconcile(dest, source, self.options.force_sync);

        if !result.changed {
            report.unchanged += 1;
            return;
        }

        let fields: Vec<&str> = result.changes.iter().map(|c| c.field.as_str()).collect();
        info!(
            id = %dest.id,
            title = %dest.summary,
            fields = %fields.join(", "),
            forced = result.forced,
            "Updating event"
        );

        match self
            .store
            .update_event(&self.calendar_id, &dest.id, &result.patched)
            .await
        {
            Ok(()) => {
                report.synced += 1;
            }
            Err(e) => {
                error!(id = %dest.id, title = %dest.summary, "Could not update event: {}", e);
                report
                    .update_failures
                    .push(FailedEvent::new(&dest.id, &dest.summary, e));
            }
        }
    }
}

fn sorted(ids: &HashSet<String>) -> Vec<&String> {
    let mut ids: Vec<&String> = ids.iter().collect();
    ids.sort();
    ids
}

fn log_summary(report: &SyncReport) {
    info!(
        added = report.added,
        removed = report.removed,
        synced = report.synced,
        unchanged = report.unchanged,
        already_exists = report.already_exists.len(),
        "Sync finished"
    );

    let failures = [
        ("add", &report.add_failures),
        ("remove", &report.remove_failures),
        ("update", &report.update_failures),
    ];
    for (operation, list) in failures {
        for failure in list {
            warn!(
                operation,
                id = %failure.id,
                title = %failure.title,
                reason = %failure.reason,
                "Failed"
            );
        }
    }
}
