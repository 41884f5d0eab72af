//! Class reminder scan.
//!
//! Triggered by an external scheduler (the job never schedules itself).
//! Each invocation joins today's active, reminder-enabled schedules against
//! the current local time and dispatches chat messages to the student's
//! guardian and the staff member inside the lead window.
//!
//! De-duplication is a 15-minute band below the lead window, sized for a
//! ~10-minute trigger cadence; there is no persisted "sent" marker, so an
//! irregular cadence can double-send or miss a window entirely.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc, Weekday};
use serde::Serialize;
use sqlx::PgPool;

use brightclass_core::{Phone, ScheduleId};

use crate::config::ReminderConfig;
use crate::db::{RepositoryError, ScheduleRepository};
use crate::models::ReminderCandidate;
use crate::services::messaging::MessagingClient;

/// Width of the de-duplication band, in minutes.
const DEDUP_BAND_MINUTES: i64 = 15;

/// Result of one reminder scan.
#[derive(Debug, Serialize)]
pub struct ReminderOutcome {
    /// Number of sends attempted (successful or failed).
    pub processed: usize,
    /// Per-recipient outcomes for schedules inside the window.
    pub details: Vec<ReminderDetail>,
}

/// Outcome of one dispatch attempt.
#[derive(Debug, Serialize)]
pub struct ReminderDetail {
    pub schedule_id: ScheduleId,
    /// `guardian` or `staff`.
    pub recipient: &'static str,
    /// Normalized destination, when one could be derived.
    pub to: Option<String>,
    /// `sent`, `failed`, or `skipped`.
    pub outcome: &'static str,
    /// Failure or skip reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One reminder scan invocation.
pub struct ReminderJob<'a> {
    pool: &'a PgPool,
    messaging: &'a MessagingClient,
    config: &'a ReminderConfig,
}

impl<'a> ReminderJob<'a> {
    /// Create a reminder job.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        messaging: &'a MessagingClient,
        config: &'a ReminderConfig,
    ) -> Self {
        Self {
            pool,
            messaging,
            config,
        }
    }

    /// Run one scan at `now`.
    ///
    /// A failed send never aborts the sweep - every in-window recipient is
    /// attempted and the outcome aggregated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only when the schedule query itself fails.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReminderOutcome, RepositoryError> {
        let (weekday, now_minutes) = local_day_and_minutes(now, self.config.utc_offset_minutes);

        let candidates = ScheduleRepository::new(self.pool).due_on(weekday).await?;

        let mut details = Vec::new();
        for candidate in &candidates {
            let minutes_until = minutes_since_midnight(candidate.start_time) - now_minutes;

            if !in_window(minutes_until, i64::from(candidate.reminder_time)) {
                continue;
            }

            let start = candidate.start_time.format("%H:%M").to_string();

            let guardian_body = format!(
                "Hello! {}'s {} class starts at {start} ({minutes_until} minutes from now). \
                 Please help them get ready.",
                candidate.student_name, candidate.subject
            );
            details.push(
                self.dispatch(
                    candidate,
                    "guardian",
                    Some(&candidate.guardian_phone),
                    &guardian_body,
                )
                .await,
            );

            let staff_body = format!(
                "Reminder: your {} class with {} starts at {start} ({minutes_until} minutes \
                 from now).",
                candidate.subject, candidate.student_name
            );
            details.push(
                self.dispatch(
                    candidate,
                    "staff",
                    candidate.staff_phone.as_deref(),
                    &staff_body,
                )
                .await,
            );
        }

        let processed = details
            .iter()
            .filter(|d| d.outcome == "sent" || d.outcome == "failed")
            .count();

        tracing::info!(
            weekday,
            schedules = candidates.len(),
            processed,
            "Reminder scan complete"
        );

        Ok(ReminderOutcome { processed, details })
    }

    /// Normalize the recipient phone and attempt one send.
    async fn dispatch(
        &self,
        candidate: &ReminderCandidate,
        recipient: &'static str,
        raw_phone: Option<&str>,
        body: &str,
    ) -> ReminderDetail {
        let Some(raw) = raw_phone else {
            return ReminderDetail {
                schedule_id: candidate.schedule_id,
                recipient,
                to: None,
                outcome: "skipped",
                reason: Some("no phone number on file".to_owned()),
            };
        };

        let phone = match Phone::normalize(raw, &self.config.country_code) {
            Ok(phone) => phone,
            Err(e) => {
                tracing::warn!(
                    schedule_id = %candidate.schedule_id,
                    recipient,
                    error = %e,
                    "Skipping reminder for unusable phone number"
                );
                return ReminderDetail {
                    schedule_id: candidate.schedule_id,
                    recipient,
                    to: None,
                    outcome: "skipped",
                    reason: Some(e.to_string()),
                };
            }
        };

        match self.messaging.send_text(&phone, body).await {
            Ok(()) => ReminderDetail {
                schedule_id: candidate.schedule_id,
                recipient,
                to: Some(phone.as_str().to_owned()),
                outcome: "sent",
                reason: None,
            },
            Err(e) => {
                tracing::warn!(
                    schedule_id = %candidate.schedule_id,
                    recipient,
                    error = %e,
                    "Reminder send failed"
                );
                ReminderDetail {
                    schedule_id: candidate.schedule_id,
                    recipient,
                    to: Some(phone.as_str().to_owned()),
                    outcome: "failed",
                    reason: Some(e.to_string()),
                }
            }
        }
    }
}

/// The dispatch window: strictly before class start, within the lead
/// window, and above the de-duplication floor.
#[must_use]
pub(crate) const fn in_window(minutes_until: i64, lead: i64) -> bool {
    minutes_until > 0 && minutes_until <= lead && minutes_until > lead - DEDUP_BAND_MINUTES
}

/// Minutes since local midnight for a wall-clock time.
pub(crate) fn minutes_since_midnight(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

/// Local weekday name and minutes-since-midnight for an instant, given the
/// configured UTC offset.
pub(crate) fn local_day_and_minutes(now: DateTime<Utc>, offset_minutes: i32) -> (&'static str, i64) {
    let local = now + Duration::minutes(i64::from(offset_minutes));
    (
        weekday_name(local.weekday()),
        minutes_since_midnight(local.time()),
    )
}

/// Lowercase weekday name matching the `class_schedule.day_of_week` column.
const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_window_with_default_lead() {
        // lead 30, band floor at 15
        assert!(in_window(22, 30));
        assert!(!in_window(40, 30));
        assert!(!in_window(5, 30));
    }

    #[test]
    fn test_window_boundaries() {
        assert!(!in_window(15, 30)); // exactly on the floor -> no dispatch
        assert!(in_window(16, 30)); // just above the floor
        assert!(in_window(30, 30)); // exactly the lead
        assert!(!in_window(31, 30)); // past the lead
    }

    #[test]
    fn test_window_never_fires_after_start() {
        assert!(!in_window(0, 30));
        assert!(!in_window(-10, 30));
    }

    #[test]
    fn test_window_with_short_lead() {
        // A 10-minute lead sits entirely inside the de-dup band
        assert!(in_window(1, 10));
        assert!(in_window(10, 10));
        assert!(!in_window(11, 10));
    }

    #[test]
    fn test_minutes_since_midnight() {
        assert_eq!(
            minutes_since_midnight(NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
            0
        );
        assert_eq!(
            minutes_since_midnight(NaiveTime::from_hms_opt(14, 30, 59).unwrap()),
            870
        );
    }

    #[test]
    fn test_local_day_and_minutes_applies_offset() {
        // 2026-08-03 is a Monday; 09:00 UTC + 60 min offset = 10:00 local
        let now = Utc.with_ymd_and_hms(2026, 8, 3, 9, 0, 0).unwrap();
        assert_eq!(now.weekday(), Weekday::Mon);

        let (day, minutes) = local_day_and_minutes(now, 60);
        assert_eq!(day, "monday");
        assert_eq!(minutes, 600);
    }

    #[test]
    fn test_local_day_rolls_over_midnight() {
        // Sunday 23:30 UTC + 60 min = Monday 00:30 local
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 23, 30, 0).unwrap();
        assert_eq!(now.weekday(), Weekday::Sun);

        let (day, minutes) = local_day_and_minutes(now, 60);
        assert_eq!(day, "monday");
        assert_eq!(minutes, 30);
    }

    #[test]
    fn test_weekday_names_match_schema_values() {
        assert_eq!(weekday_name(Weekday::Mon), "monday");
        assert_eq!(weekday_name(Weekday::Sun), "sunday");
    }
}
