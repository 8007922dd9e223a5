//! Field-level reconciliation of a destination event against its feed event.
//!
//! Comparison rules per field:
//! - start/end: compared as UTC instants; zone labels are ignored, and a side
//!   without a parseable instant makes the field incomparable (skipped)
//! - sequence: compared as coerced strings, so `5` and `"5"` agree
//! - organizer: never compared, the store resets it on every write
//! - everything else: plain inequality

mod field;
mod patch;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::event::{DestinationEvent, EventTime, SourceEvent};

pub use field::{Field, FieldChange};
pub use patch::EventPatch;

/// Whether to rewrite events that show no divergence, and with what patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForceSync {
    #[default]
    Off,
    /// Mark unchanged events as changed, with a patch that carries no fields.
    EmptyPatch,
    /// Mark unchanged events as changed and carry every feed value in the patch.
    FullPatch,
}

impl FromStr for ForceSync {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(ForceSync::Off),
            "empty-patch" => Ok(ForceSync::EmptyPatch),
            "full-patch" => Ok(ForceSync::FullPatch),
            other => Err(format!(
                "Unknown force-sync mode '{}'. Expected off, empty-patch or full-patch",
                other
            )),
        }
    }
}

impl fmt::Display for ForceSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForceSync::Off => write!(f, "off"),
            ForceSync::EmptyPatch => write!(f, "empty-patch"),
            ForceSync::FullPatch => write!(f, "full-patch"),
        }
    }
}

/// Outcome of comparing one destination event with its feed event.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Whether the destination needs an update call.
    pub changed: bool,
    /// True when `changed` comes only from [`ForceSync`].
    pub forced: bool,
    pub changes: Vec<FieldChange>,
    pub patch: EventPatch,
    /// `dest` with `patch` applied.
    pub patched: DestinationEvent,
}

impl Reconciliation {
    pub fn changed_fields(&self) -> Vec<Field> {
        self.changes.iter().map(|c| c.field).collect()
    }
}

enum Comparison {
    Same,
    Differs,
    Incomparable,
}

pub fn reconcile(
    dest: &DestinationEvent,
    source: &SourceEvent,
    force: ForceSync,
) -> Reconciliation {
    let mut changes = Vec::new();
    let mut patch = EventPatch::default();

    for field in Field::ALL {
        let comparison = match field {
            Field::Title => plain(&dest.summary, &source.summary),
            Field::Start => times(&dest.id, field, &dest.start, &source.start),
            Field::End => times(&dest.id, field, &dest.end, &source.end),
            Field::Sequence => plain(&dest.sequence.coerced(), &source.sequence.coerced()),
            Field::Location => plain(&dest.location, &source.location),
            Field::Description => plain(&dest.description, &source.description),
            Field::Organizer => continue,
        };

        if let Comparison::Differs = comparison {
            let change = FieldChange {
                field,
                before: render(dest, field),
                after: render_source(source, field),
            };
            info!(
                id = %dest.id,
                field = %field,
                destination = %change.before,
                feed = %change.after,
                "Field changed"
            );
            patch.take(field, source);
            changes.push(change);
        }
    }

    let diverged = !changes.is_empty();
    let forced = !diverged && force != ForceSync::Off;

    if forced {
        info!(id = %dest.id, mode = %force, "No field changed, forcing a rewrite");
        if force == ForceSync::FullPatch {
            patch = EventPatch::full(source);
        }
    }

    let patched = patch.apply(dest);

    Reconciliation {
        changed: diverged || forced,
        forced,
        changes,
        patch,
        patched,
    }
}

fn plain(dest: &str, source: &str) -> Comparison {
    if dest == source {
        Comparison::Same
    } else {
        Comparison::Differs
    }
}

fn times(id: &str, field: Field, dest: &EventTime, source: &EventTime) -> Comparison {
    let name = field.as_str();
    match (dest.instant(name), source.instant(name)) {
        (Ok(d), Ok(s)) if d == s => Comparison::Same,
        (Ok(_), Ok(_)) => Comparison::Differs,
        (Err(e), _) | (_, Err(e)) => {
            debug!(id, field = name, "Cannot compare: {}", e);
            Comparison::Incomparable
        }
    }
}

fn render(dest: &DestinationEvent, field: Field) -> String {
    match field {
        Field::Title => dest.summary.clone(),
        Field::Start => dest.start.to_string(),
        Field::End => dest.end.to_string(),
        Field::Sequence => dest.sequence.to_string(),
        Field::Location => dest.location.clone(),
        Field::Description => dest.description.clone(),
        Field::Organizer => dest
            .organizer
            .as_ref()
            .map(|o| o.to_string())
            .unwrap_or_default(),
    }
}

fn render_source(source: &SourceEvent, field: Field) -> String {
    match field {
        Field::Title => source.summary.clone(),
        Field::Start => source.start.to_string(),
        Field::End => source.end.to_string(),
        Field::Sequence => source.sequence.to_string(),
        Field::Location => source.location.clone(),
        Field::Description => source.description.clone(),
        Field::Organizer => source.organizer.to_string(),
    }
}
