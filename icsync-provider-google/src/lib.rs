//! Google Calendar as an icsync destination store.
//!
//! OAuth client credentials and account sessions are read from:
//!   ~/.config/icsync/google/app_config.toml
//!   ~/.config/icsync/google/session/{account}.toml

mod app_config;
mod google_event;
mod session;
mod store;

pub use session::{Session, SessionData};
pub use store::GoogleStore;
