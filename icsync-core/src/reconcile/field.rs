use std::fmt;

use serde::{Deserialize, Serialize};

/// Event fields the reconciler looks at, in comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Start,
    End,
    Sequence,
    Location,
    Description,
    Organizer,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Start,
        Field::End,
        Field::Sequence,
        Field::Location,
        Field::Description,
        Field::Organizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Start => "start",
            Field::End => "end",
            Field::Sequence => "sequence",
            Field::Location => "location",
            Field::Description => "description",
            Field::Organizer => "organizer",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diverged field, with both values rendered for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: Field,
    pub before: String,
    pub after: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, self.before, self.after)
    }
}
