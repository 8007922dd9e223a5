//! Event types shared by the feed side and the destination side.
//!
//! A `SourceEvent` is built once per run from a feed record and never changes
//! afterwards. A `DestinationEvent` mirrors what the destination store holds;
//! the orchestrator builds new ones on add and patches copies on sync.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Zone label attached to every normalized feed timestamp.
pub const UTC_ZONE: &str = "UTC";

/// A start or end timestamp as carried by either side.
///
/// `date_time` keeps the RFC 3339 text as produced, so two values with
/// different offsets can still describe the same instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    pub date_time: Option<String>,
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn utc(instant: DateTime<Utc>) -> Self {
        EventTime {
            date_time: Some(instant.to_rfc3339()),
            time_zone: Some(UTC_ZONE.to_string()),
        }
    }

    /// An event time with no usable instant (e.g. DTSTART missing in the feed).
    pub fn unknown() -> Self {
        EventTime {
            date_time: None,
            time_zone: Some(UTC_ZONE.to_string()),
        }
    }

    /// The instant this time points at, normalized to UTC. The zone label is ignored.
    pub fn instant(&self, field: &'static str) -> SyncResult<DateTime<Utc>> {
        let raw = self
            .date_time
            .as_deref()
            .ok_or_else(|| SyncError::UnparseableTimestamp {
                field,
                value: String::new(),
            })?;

        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| SyncError::UnparseableTimestamp {
                field,
                value: raw.to_string(),
            })
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.date_time, &self.time_zone) {
            (Some(dt), Some(tz)) => write!(f, "{} ({})", dt, tz),
            (Some(dt), None) => write!(f, "{}", dt),
            (None, _) => write!(f, "(no time)"),
        }
    }
}

/// Revision counter. Feeds hand it over as text, stores usually as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sequence {
    Number(i64),
    Text(String),
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence::Text(String::new())
    }
}

impl Sequence {
    /// String form used for comparison.
    ///
    /// An empty text stands for "no SEQUENCE" and compares as `"0"`, the
    /// value a store assigns to an event that never carried one.
    pub fn coerced(&self) -> String {
        match self {
            Sequence::Number(n) => n.to_string(),
            Sequence::Text(s) if s.trim().is_empty() => "0".to_string(),
            Sequence::Text(s) => s.trim().to_string(),
        }
    }

    /// Numeric value for stores that only accept integers.
    pub fn as_number(&self) -> i64 {
        self.coerced().parse().unwrap_or(0)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Number(n) => write!(f, "{}", n),
            Sequence::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Event organizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub email: String,
    pub display_name: String,
}

impl fmt::Display for Organizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.display_name.is_empty(), self.email.is_empty()) {
            (true, true) => write!(f, "(none)"),
            (true, false) => write!(f, "<{}>", self.email),
            (false, true) => write!(f, "{}", self.display_name),
            (false, false) => write!(f, "{} <{}>", self.display_name, self.email),
        }
    }
}

/// An event read from an upstream feed, normalized and ready for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvent {
    /// Sanitized identifier, the join key against the destination.
    pub id: String,
    /// The feed's own UID, kept for logging and collision reports.
    pub raw_id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub sequence: Sequence,
    pub location: String,
    pub description: String,
    pub organizer: Organizer,
}

/// An event as held by the destination store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationEvent {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub sequence: Sequence,
    pub location: String,
    pub description: String,
    /// Owned by the store account; sync never writes it.
    pub organizer: Option<Organizer>,
}

impl From<&SourceEvent> for DestinationEvent {
    fn from(source: &SourceEvent) -> Self {
        DestinationEvent {
            id: source.id.clone(),
            summary: source.summary.clone(),
            start: source.start.clone(),
            end: source.end.clone(),
            sequence: source.sequence.clone(),
            location: source.location.clone(),
            description: source.description.clone(),
            organizer: None,
        }
    }
}

impl fmt::Display for SourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.id)
    }
}

impl fmt::Display for DestinationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn instant_ignores_offset_and_zone_label() {
        let eastern = EventTime {
            date_time: Some("2018-10-04T13:00:00-04:00".to_string()),
            time_zone: Some("America/New_York".to_string()),
        };
        let utc = EventTime {
            date_time: Some("2018-10-04T17:00:00Z".to_string()),
            time_zone: None,
        };

        assert_eq!(
            eastern.instant("start").unwrap(),
            utc.instant("start").unwrap()
        );
        assert_eq!(
            utc.instant("start").unwrap(),
            Utc.with_ymd_and_hms(2018, 10, 4, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn instant_reports_unparseable_values() {
        let missing = EventTime::unknown();
        assert!(matches!(
            missing.instant("end"),
            Err(SyncError::UnparseableTimestamp { field: "end", .. })
        ));

        let garbage = EventTime {
            date_time: Some("next tuesday".to_string()),
            time_zone: None,
        };
        match garbage.instant("start") {
            Err(SyncError::UnparseableTimestamp { field, value }) => {
                assert_eq!(field, "start");
                assert_eq!(value, "next tuesday");
            }
            other => panic!("Expected UnparseableTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn sequence_coercion_matches_number_and_text() {
        assert_eq!(
            Sequence::Number(5).coerced(),
            Sequence::Text("5".to_string()).coerced()
        );
        assert_eq!(Sequence::default().coerced(), Sequence::Number(0).coerced());
        assert_ne!(
            Sequence::Number(4).coerced(),
            Sequence::Text("5".to_string()).coerced()
        );
    }

    #[test]
    fn destination_from_source_leaves_organizer_unset() {
        let source = SourceEvent {
            id: "abc123".to_string(),
            raw_id: "abc.123@example.org".to_string(),
            summary: "Standup".to_string(),
            start: EventTime::utc(Utc.with_ymd_and_hms(2018, 10, 4, 17, 0, 0).unwrap()),
            end: EventTime::utc(Utc.with_ymd_and_hms(2018, 10, 4, 18, 0, 0).unwrap()),
            sequence: Sequence::Text("2".to_string()),
            location: "Room 1".to_string(),
            description: String::new(),
            organizer: Organizer {
                email: "team@example.org".to_string(),
                display_name: "Team".to_string(),
            },
        };

        let dest = DestinationEvent::from(&source);
        assert_eq!(dest.id, "abc123");
        assert_eq!(dest.summary, "Standup");
        assert_eq!(dest.organizer, None);
    }
}
