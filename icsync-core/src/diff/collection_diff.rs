//! Partition of identifiers into add/remove/sync sets.

use std::collections::HashSet;

/// Identifiers grouped by the operation they need. Iteration order of each
/// set is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionDiff {
    /// In the feeds, not in the destination
    pub add: HashSet<String>,
    /// In the destination, gone from the feeds
    pub remove: HashSet<String>,
    /// In both; needs a field-level comparison
    pub sync: HashSet<String>,
}

/// Compare feed identifiers against destination identifiers.
pub fn diff(source_ids: &HashSet<String>, dest_ids: &HashSet<String>) -> CollectionDiff {
    CollectionDiff {
        add: source_ids.difference(dest_ids).cloned().collect(),
        remove: dest_ids.difference(source_ids).cloned().collect(),
        sync: source_ids.intersection(dest_ids).cloned().collect(),
    }
}

impl CollectionDiff {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.sync.is_empty()
    }
}
