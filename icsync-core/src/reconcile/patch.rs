use serde::{Deserialize, Serialize};

use crate::event::{DestinationEvent, EventTime, Sequence, SourceEvent};
use crate::reconcile::Field;

/// The fields to overwrite on a destination event. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    pub summary: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub sequence: Option<Sequence>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl EventPatch {
    /// A patch carrying every sync-writable value of `source`.
    ///
    /// Start and end are only carried when they hold a parseable instant.
    pub fn full(source: &SourceEvent) -> Self {
        EventPatch {
            summary: Some(source.summary.clone()),
            start: comparable(&source.start, "start"),
            end: comparable(&source.end, "end"),
            sequence: Some(source.sequence.clone()),
            location: Some(source.location.clone()),
            description: Some(source.description.clone()),
        }
    }

    /// Copy one field's value from `source` into the patch.
    /// Organizer is never carried: the store owns it.
    pub fn take(&mut self, field: Field, source: &SourceEvent) {
        match field {
            Field::Title => self.summary = Some(source.summary.clone()),
            Field::Start => self.start = Some(source.start.clone()),
            Field::End => self.end = Some(source.end.clone()),
            Field::Sequence => self.sequence = Some(source.sequence.clone()),
            Field::Location => self.location = Some(source.location.clone()),
            Field::Description => self.description = Some(source.description.clone()),
            Field::Organizer => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        if self.summary.is_some() {
            fields.push(Field::Title);
        }
        if self.start.is_some() {
            fields.push(Field::Start);
        }
        if self.end.is_some() {
            fields.push(Field::End);
        }
        if self.sequence.is_some() {
            fields.push(Field::Sequence);
        }
        if self.location.is_some() {
            fields.push(Field::Location);
        }
        if self.description.is_some() {
            fields.push(Field::Description);
        }
        fields
    }

    pub fn apply(&self, dest: &DestinationEvent) -> DestinationEvent {
        let mut patched = dest.clone();
        if let Some(ref summary) = self.summary {
            patched.summary = summary.clone();
        }
        if let Some(ref start) = self.start {
            patched.start = start.clone();
        }
        if let Some(ref end) = self.end {
            patched.end = end.clone();
        }
        if let Some(ref sequence) = self.sequence {
            patched.sequence = sequence.clone();
        }
        if let Some(ref location) = self.location {
            patched.location = location.clone();
        }
        if let Some(ref description) = self.description {
            patched.description = description.clone();
        }
        patched
    }
}

fn comparable(time: &EventTime, field: &'static str) -> Option<EventTime> {
    time.instant(field).ok().map(|_| time.clone())
}
