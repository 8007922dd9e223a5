//! Keyed accumulator of normalized feed events.
//!
//! The caller owns one `SourceCollection` per run and feeds every upstream
//! document into it; nothing is retained between runs.

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::SyncResult;
use crate::event::SourceEvent;
use crate::ics::parse_feed;
use crate::normalize::normalize;

/// What happened when an event was inserted.
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion {
    New,
    /// The same feed UID was seen before; the newer record replaced it.
    Replaced,
    /// A different feed UID already sanitized to the same id. The first one is kept.
    Collision { kept: String, rejected: String },
}

/// Counts for one feed document added to a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub parsed: usize,
    pub added: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub collisions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SourceCollection {
    events: HashMap<String, SourceEvent>,
}

impl SourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: SourceEvent) -> Insertion {
        let existing_raw_id = self.events.get(&event.id).map(|e| e.raw_id.clone());

        match existing_raw_id {
            None => {
                self.events.insert(event.id.clone(), event);
                Insertion::New
            }
            Some(raw_id) if raw_id == event.raw_id => {
                self.events.insert(event.id.clone(), event);
                Insertion::Replaced
            }
            Some(kept) => Insertion::Collision {
                kept,
                rejected: event.raw_id,
            },
        }
    }

    /// Parse one feed document and add every usable event from it.
    ///
    /// Records without a UID are skipped; only a document that cannot be
    /// parsed at all is an error.
    pub fn extend_from_feed(&mut self, content: &str) -> SyncResult<FeedStats> {
        let raw_events = parse_feed(content)?;
        let mut stats = FeedStats {
            parsed: raw_events.len(),
            ..Default::default()
        };

        for raw in &raw_events {
            let event = match normalize(raw) {
                Ok(event) => event,
                Err(e) => {
                    warn!(
                        summary = raw.summary.as_deref().unwrap_or(""),
                        "Skipping feed event: {}",
                        e
                    );
                    stats.skipped += 1;
                    continue;
                }
            };

            let id = event.id.clone();
            match self.insert(event) {
                Insertion::New => stats.added += 1,
                Insertion::Replaced => {
                    debug!(id = %id, "Feed event seen again, keeping the later copy");
                    stats.replaced += 1;
                }
                Insertion::Collision { kept, rejected } => {
                    warn!(
                        id = %id,
                        kept = %kept,
                        rejected = %rejected,
                        "Sanitized identifier collision, dropping the later event"
                    );
                    stats.collisions += 1;
                }
            }
        }

        info!(
            parsed = stats.parsed,
            added = stats.added,
            replaced = stats.replaced,
            skipped = stats.skipped,
            collisions = stats.collisions,
            "Read feed"
        );

        Ok(stats)
    }

    pub fn get(&self, id: &str) -> Option<&SourceEvent> {
        self.events.get(id)
    }

    pub fn ids(&self) -> HashSet<String> {
        self.events.keys().cloned().collect()
    }

    pub fn events(&self) -> impl Iterator<Item = &SourceEvent> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<SourceEvent> for SourceCollection {
    fn from_iter<I: IntoIterator<Item = SourceEvent>>(iter: I) -> Self {
        let mut collection = SourceCollection::new();
        for event in iter {
            collection.insert(event);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventTime, Organizer, Sequence};

    fn event(raw_id: &str, summary: &str) -> SourceEvent {
        SourceEvent {
            id: crate::sanitize::sanitize(raw_id),
            raw_id: raw_id.to_string(),
            summary: summary.to_string(),
            start: EventTime::unknown(),
            end: EventTime::unknown(),
            sequence: Sequence::default(),
            location: String::new(),
            description: String::new(),
            organizer: Organizer::default(),
        }
    }

    #[test]
    fn test_insert_detects_sanitized_collisions() {
        let mut collection = SourceCollection::new();
        assert_eq!(collection.insert(event("a.b@c", "first")), Insertion::New);
        assert_eq!(
            collection.insert(event("ab@c", "second")),
            Insertion::Collision {
                kept: "a.b@c".to_string(),
                rejected: "ab@c".to_string(),
            }
        );
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("abc").unwrap().summary, "first");
    }

    #[test]
    fn test_insert_replaces_same_uid() {
        let mut collection = SourceCollection::new();
        collection.insert(event("x@y", "old"));
        assert_eq!(collection.insert(event("x@y", "new")), Insertion::Replaced);
        assert_eq!(collection.get("xy").unwrap().summary, "new");
    }

    #[test]
    fn test_extend_from_feed_accumulates_across_feeds() {
        let feed_a = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:calendar.1.100@groups.io\r\n\
DTSTART:20181004T170000Z\r\n\
DTEND:20181004T180000Z\r\n\
SUMMARY:A\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:no uid\r\n\
END:VEVENT\r\n\
END:VCALENDAR";
        let feed_b = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:calendar.1.200@groups.io\r\n\
DTSTART:20181005T170000Z\r\n\
DTEND:20181005T180000Z\r\n\
SUMMARY:B\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let mut collection = SourceCollection::new();
        let stats_a = collection.extend_from_feed(feed_a).expect("Should read feed A");
        let stats_b = collection.extend_from_feed(feed_b).expect("Should read feed B");

        assert_eq!(stats_a.parsed, 2);
        assert_eq!(stats_a.added, 1);
        assert_eq!(stats_a.skipped, 1);
        assert_eq!(stats_b.added, 1);
        assert_eq!(collection.len(), 2);
        assert!(collection.get("calendar1100groupsio").is_some());
        assert!(collection.get("calendar1200groupsio").is_some());
    }

    #[test]
    fn test_extend_from_feed_skips_uid_that_sanitizes_to_nothing() {
        let feed = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:@.-\r\n\
DTSTART:20181004T170000Z\r\n\
DTEND:20181004T180000Z\r\n\
SUMMARY:Punctuation only\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let mut collection = SourceCollection::new();
        let stats = collection.extend_from_feed(feed).expect("Should read feed");

        assert_eq!(stats.parsed, 1);
        assert_eq!(stats.added, 0);
        assert_eq!(stats.skipped, 1);
        assert!(collection.is_empty());
        assert!(collection.get("").is_none());
    }
}
