//! Turn raw feed records into comparison-ready `SourceEvent`s.
//!
//! Feed timestamps are always read as UTC (`YYYYMMDDTHHMMSSZ`); any TZID
//! parameter in the feed is ignored.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::error::{SyncError, SyncResult};
use crate::event::{EventTime, Organizer, Sequence, SourceEvent};
use crate::ics::{RawEvent, RawOrganizer};
use crate::sanitize::{is_sanitized, sanitize};

const FEED_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Normalize one feed record.
///
/// Fails with [`SyncError::MissingIdentifier`] or [`SyncError::EmptyIdentifier`];
/// the caller skips that record and carries on with the rest of the feed.
pub fn normalize(raw: &RawEvent) -> SyncResult<SourceEvent> {
    let raw_id = raw.uid.clone().ok_or(SyncError::MissingIdentifier)?;
    let id = sanitize(&raw_id);
    if !is_sanitized(&id) {
        return Err(SyncError::EmptyIdentifier(raw_id));
    }

    let start = feed_time(raw.dtstart.as_deref(), "start", &raw_id);
    let end = feed_time(raw.dtend.as_deref(), "end", &raw_id);

    let organizer = raw
        .organizer
        .as_ref()
        .map(to_organizer)
        .unwrap_or_default();

    let description = permalink(&raw_id, &organizer.email)
        .map(|url| anchor(&url))
        .unwrap_or_default();

    Ok(SourceEvent {
        id,
        raw_id,
        summary: raw.summary.clone().unwrap_or_default(),
        start,
        end,
        sequence: Sequence::Text(raw.sequence.clone().unwrap_or_default()),
        location: raw.location.clone().unwrap_or_default(),
        description,
        organizer,
    })
}

/// Parse a strict UTC feed timestamp.
pub fn parse_feed_timestamp(value: &str, field: &'static str) -> SyncResult<EventTime> {
    NaiveDateTime::parse_from_str(value.trim(), FEED_TIMESTAMP_FORMAT)
        .map(|naive| EventTime::utc(naive.and_utc()))
        .map_err(|_| SyncError::UnparseableTimestamp {
            field,
            value: value.to_string(),
        })
}

fn feed_time(value: Option<&str>, field: &'static str, raw_id: &str) -> EventTime {
    let result = match value {
        Some(v) => parse_feed_timestamp(v, field),
        None => Err(SyncError::UnparseableTimestamp {
            field,
            value: String::new(),
        }),
    };

    result.unwrap_or_else(|e| {
        warn!(uid = raw_id, "{}", e);
        EventTime::unknown()
    })
}

fn to_organizer(raw: &RawOrganizer) -> Organizer {
    let address = raw.address.trim();
    let email = address
        .strip_prefix("mailto:")
        .or_else(|| address.strip_prefix("MAILTO:"))
        .unwrap_or(address)
        .to_string();

    Organizer {
        email,
        display_name: raw.common_name.clone().unwrap_or_default(),
    }
}

/// Event page on the organizer's group site.
///
/// The organizer mailbox `{group}@{domain}` names the group, and the event
/// number is the last dot-separated segment of the UID's local part, so
/// `calendar.9284.327237@groups.io` organized by `kc6tech@dcppc.groups.io`
/// maps to `https://dcppc.groups.io/g/kc6tech/viewevent?eventid=327237`.
pub fn permalink(raw_id: &str, organizer_email: &str) -> Option<String> {
    let (group, domain) = organizer_email.split_once('@')?;
    if group.is_empty() || domain.is_empty() {
        return None;
    }

    let local = raw_id.split('@').next().unwrap_or(raw_id);
    let event_number = local.rsplit('.').next().filter(|n| !n.is_empty())?;

    Some(format!(
        "https://{}/g/{}/viewevent?eventid={}",
        domain, group, event_number
    ))
}

fn anchor(url: &str) -> String {
    format!("<a href=\"{url}\">{url}</a>")
}
