//! Applying a diff to the destination store.

mod orchestrator;
mod report;

pub use orchestrator::{Orchestrator, SyncOptions};
pub use report::{FailedEvent, SyncReport};
