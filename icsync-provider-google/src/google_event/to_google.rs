use icsync_core::{DestinationEvent, EventTime};

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

/// The organizer is never written: Google assigns it to the calendar owner.
impl ToGoogle for DestinationEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            id: self.id.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start: event_time_to_google(&self.start, "start"),
            end: event_time_to_google(&self.end, "end"),
            sequence: self.sequence.as_number(),
            ..Default::default()
        }
    }
}

/// Unknown times are sent as absent and left for Google to reject.
fn event_time_to_google(
    time: &EventTime,
    field: &'static str,
) -> Option<google_calendar::types::EventDateTime> {
    let instant = time.instant(field).ok()?;

    Some(google_calendar::types::EventDateTime {
        date: None,
        date_time: Some(instant),
        time_zone: time.time_zone.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsync_core::{Organizer, Sequence};

    fn event() -> DestinationEvent {
        DestinationEvent {
            id: "abc123".to_string(),
            summary: "Weekly call".to_string(),
            start: EventTime {
                date_time: Some("2018-10-04T13:00:00-04:00".to_string()),
                time_zone: Some("America/New_York".to_string()),
            },
            end: EventTime::unknown(),
            sequence: Sequence::Text("3".to_string()),
            location: "Room 4".to_string(),
            description: String::new(),
            organizer: Some(Organizer {
                email: "someone@example.com".to_string(),
                display_name: String::new(),
            }),
        }
    }

    #[test]
    fn test_to_google_carries_sync_fields() {
        let google = event().to_google();

        assert_eq!(google.id, "abc123");
        assert_eq!(google.summary, "Weekly call");
        assert_eq!(google.location, "Room 4");
        assert_eq!(google.sequence, 3);

        let start = google.start.unwrap();
        assert_eq!(
            start.date_time.unwrap().to_rfc3339(),
            "2018-10-04T17:00:00+00:00"
        );
        assert_eq!(start.time_zone, "America/New_York");
    }

    #[test]
    fn test_to_google_skips_unknown_times_and_organizer() {
        let google = event().to_google();
        assert!(google.end.is_none());
        assert!(google.organizer.is_none());
    }
}
