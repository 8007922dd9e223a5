//! Integrated calendar export.

use icalendar::{Calendar, Component, EventLike, Property};

use crate::event::{EventTime, SourceEvent};
use crate::normalize::permalink;

static PRODID: &str = "-//icsync//Integrated Calendar//EN";

/// Render every event into one published calendar document.
///
/// UIDs are the original feed UIDs. The description is the plain event
/// permalink when one can be built, otherwise the normalized description.
pub fn generate_merged_calendar<'a>(
    name: &str,
    events: impl IntoIterator<Item = &'a SourceEvent>,
) -> String {
    let mut events: Vec<&SourceEvent> = events.into_iter().collect();
    events.sort_by(|a, b| {
        a.start
            .date_time
            .cmp(&b.start.date_time)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut cal = Calendar::new();
    cal.name(name);
    cal.append_property(Property::new("METHOD", "PUBLISH"));

    for event in events {
        cal.push(to_ics_event(event));
    }

    replace_prodid(&cal.done().to_string())
}

fn to_ics_event(event: &SourceEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.raw_id);
    ics_event.summary(&event.summary);
    ics_event.add_property("SEQUENCE", event.sequence.coerced());

    add_time(&mut ics_event, "DTSTART", "start", &event.start);
    add_time(&mut ics_event, "DTEND", "end", &event.end);

    if !event.location.is_empty() {
        ics_event.location(&event.location);
    }

    match permalink(&event.raw_id, &event.organizer.email) {
        Some(url) => {
            ics_event.description(&url);
        }
        None if !event.description.is_empty() => {
            ics_event.description(&event.description);
        }
        None => {}
    }

    if !event.organizer.email.is_empty() {
        let mut prop = Property::new("ORGANIZER", format!("mailto:{}", event.organizer.email));
        if !event.organizer.display_name.is_empty() {
            prop.add_parameter("CN", &event.organizer.display_name);
        }
        ics_event.append_property(prop);
    }

    ics_event.done()
}

/// Unknown times are left out rather than invented.
fn add_time(ics_event: &mut icalendar::Event, name: &str, field: &'static str, time: &EventTime) {
    if let Ok(instant) = time.instant(field) {
        ics_event.add_property(name, instant.format("%Y%m%dT%H%M%SZ").to_string());
    }
}

fn replace_prodid(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }
    result
}
