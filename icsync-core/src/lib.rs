//! Mirror iCalendar feeds into a destination calendar.
//!
//! Feeds are parsed and normalized into a [`SourceCollection`], diffed against
//! the destination store's listing, and reconciled field by field. The
//! [`Orchestrator`] applies the result through a [`DestinationStore`].

pub mod calendar_id;
pub mod collection;
pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod ics;
pub mod normalize;
pub mod reconcile;
pub mod sanitize;
pub mod store;
pub mod sync;

pub use calendar_id::{CalendarIdFile, resolve_calendar};
pub use collection::{FeedStats, Insertion, SourceCollection};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use event::{DestinationEvent, EventTime, Organizer, Sequence, SourceEvent};
pub use reconcile::{ForceSync, reconcile};
pub use store::{CreateOutcome, DestinationStore, EventPage};
pub use sync::{FailedEvent, Orchestrator, SyncOptions, SyncReport};
