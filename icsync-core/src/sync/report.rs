use serde::Serialize;

/// An event whose store call did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEvent {
    pub id: String,
    pub title: String,
    pub reason: String,
}

impl FailedEvent {
    pub fn new(id: &str, title: &str, reason: impl ToString) -> Self {
        FailedEvent {
            id: id.to_string(),
            title: title.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Summary of one run against the destination store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
    /// Events updated in the store.
    pub synced: usize,
    /// Events compared and found equal.
    pub unchanged: usize,
    pub add_failures: Vec<FailedEvent>,
    /// Creates refused because the store already held the id. Not counted as failures.
    pub already_exists: Vec<FailedEvent>,
    pub remove_failures: Vec<FailedEvent>,
    pub update_failures: Vec<FailedEvent>,
}

impl SyncReport {
    pub fn failure_count(&self) -> usize {
        self.add_failures.len() + self.remove_failures.len() + self.update_failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }
}
