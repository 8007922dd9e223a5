//! Set-level diff between feed events and destination events.

mod collection_diff;
mod diff_kind;

pub use collection_diff::{CollectionDiff, diff};
pub use diff_kind::DiffKind;
