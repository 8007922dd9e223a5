use icsync_core::{DestinationEvent, EventTime, Organizer, Sequence};

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Self;
}

impl FromGoogle for DestinationEvent {
    fn from_google(event: google_calendar::types::Event) -> Self {
        let organizer = event.organizer.as_ref().map(|o| Organizer {
            email: o.email.clone(),
            display_name: o.display_name.clone(),
        });

        DestinationEvent {
            id: event.id,
            summary: event.summary,
            start: event_time_from_google(event.start.as_ref()),
            end: event_time_from_google(event.end.as_ref()),
            sequence: Sequence::Number(event.sequence),
            location: event.location,
            description: event.description,
            organizer,
        }
    }
}

/// All-day events have no instant; they are read as midnight UTC of their date.
fn event_time_from_google(time: Option<&google_calendar::types::EventDateTime>) -> EventTime {
    let Some(time) = time else {
        return EventTime::unknown();
    };

    let instant = time
        .date_time
        .or_else(|| time.date.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc()));

    match instant {
        Some(instant) => EventTime {
            date_time: Some(instant.to_rfc3339()),
            time_zone: if time.time_zone.is_empty() {
                None
            } else {
                Some(time.time_zone.clone())
            },
        },
        None => EventTime::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use google_calendar::types::EventDateTime;

    fn google_event() -> google_calendar::types::Event {
        google_calendar::types::Event {
            id: "abc123".to_string(),
            summary: "Weekly call".to_string(),
            start: Some(EventDateTime {
                date: None,
                date_time: Some(Utc.with_ymd_and_hms(2018, 10, 4, 17, 0, 0).unwrap()),
                time_zone: "America/New_York".to_string(),
            }),
            end: Some(EventDateTime {
                date: Some(NaiveDate::from_ymd_opt(2018, 10, 5).unwrap()),
                date_time: None,
                time_zone: String::new(),
            }),
            sequence: 2,
            organizer: Some(google_calendar::types::Organizer {
                email: "owner@group.calendar.google.com".to_string(),
                display_name: "Integrated Calendar".to_string(),
                id: String::new(),
                self_: false,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_google() {
        let event = DestinationEvent::from_google(google_event());

        assert_eq!(event.id, "abc123");
        assert_eq!(event.sequence, Sequence::Number(2));
        assert_eq!(
            event.start.instant("start").unwrap(),
            Utc.with_ymd_and_hms(2018, 10, 4, 17, 0, 0).unwrap()
        );
        assert_eq!(event.start.time_zone.as_deref(), Some("America/New_York"));
        assert_eq!(
            event.organizer.unwrap().email,
            "owner@group.calendar.google.com"
        );
    }

    #[test]
    fn test_all_day_end_reads_as_midnight_utc() {
        let event = DestinationEvent::from_google(google_event());
        assert_eq!(
            event.end.instant("end").unwrap(),
            Utc.with_ymd_and_hms(2018, 10, 5, 0, 0, 0).unwrap()
        );
        assert_eq!(event.end.time_zone, None);
    }

    #[test]
    fn test_missing_start_is_unknown() {
        let mut google = google_event();
        google.start = None;
        let event = DestinationEvent::from_google(google);
        assert!(event.start.instant("start").is_err());
    }
}
