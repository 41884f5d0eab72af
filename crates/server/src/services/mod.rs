//! Service layer: token verification, outbound email/messaging, the
//! parameterized account lifecycle, and the reminder scan.

pub mod email;
pub mod lifecycle;
pub mod messaging;
pub mod reminders;
pub mod tokens;

pub use email::{EmailError, EmailService};
pub use lifecycle::{AccountLifecycle, LifecycleError, SignupOutcome, SignupRequest};
pub use messaging::{MessagingClient, MessagingError};
pub use reminders::{ReminderJob, ReminderOutcome};
pub use tokens::{TokenError, TokenService};
