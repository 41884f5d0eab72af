//! Domain models for the Brightclass server.
//!
//! Repositories in [`crate::db`] convert database rows into these types;
//! route handlers serialize them straight into JSON responses. The typed
//! `New*`/`*Update` payload structs double as the per-entity field
//! allow-list: a client cannot reach a column these structs do not name.

pub mod account;
pub mod content;
pub mod schedule;
pub mod token;

pub use account::{Account, NewAccount};
pub use content::*;
pub use schedule::{ClassSchedule, NewSchedule, ReminderCandidate, ScheduleUpdate};
pub use token::VerificationToken;
