//! Feed parsing using the icalendar crate's parser.

use icalendar::parser::{Component, Property, read_calendar, unfold};

use crate::error::{SyncError, SyncResult};

/// A VEVENT as found in a feed, values taken verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub uid: Option<String>,
    pub summary: Option<String>,
    pub dtstart: Option<String>,
    pub dtend: Option<String>,
    pub sequence: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub organizer: Option<RawOrganizer>,
}

/// ORGANIZER property: the calendar address plus its CN parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOrganizer {
    /// Usually `mailto:someone@example.org`
    pub address: String,
    pub common_name: Option<String>,
}

/// Parse feed text into its VEVENT records.
pub fn parse_feed(content: &str) -> SyncResult<Vec<RawEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| SyncError::Feed(e.to_string()))?;

    Ok(calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(to_raw_event)
        .collect())
}

fn to_raw_event(vevent: &Component) -> RawEvent {
    let text = |name: &str| vevent.find_prop(name).map(|p| p.val.to_string());

    RawEvent {
        uid: text("UID").filter(|uid| !uid.trim().is_empty()),
        summary: text("SUMMARY"),
        dtstart: text("DTSTART"),
        dtend: text("DTEND"),
        sequence: text("SEQUENCE"),
        location: text("LOCATION"),
        description: text("DESCRIPTION"),
        organizer: vevent.find_prop("ORGANIZER").map(parse_organizer),
    }
}

fn parse_organizer(prop: &Property) -> RawOrganizer {
    let common_name = prop
        .params
        .iter()
        .find(|p| p.key == "CN")
        .and_then(|p| p.val.as_ref())
        .map(|v| v.to_string().trim_matches('"').to_string());

    RawOrganizer {
        address: prop.val.to_string(),
        common_name,
    }
}
