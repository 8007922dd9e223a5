//! Reading feeds and writing the integrated calendar.

mod generate;
mod parse;

pub use generate::generate_merged_calendar;
pub use parse::{RawEvent, RawOrganizer, parse_feed};
