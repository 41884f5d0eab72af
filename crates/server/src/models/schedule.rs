//! Class schedule model and the reminder job's query projection.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use brightclass_core::{AccountId, ScheduleId};

/// A weekly class schedule entry.
///
/// `day_of_week` holds the lowercase weekday name; `reminder_time` is the
/// lead window in minutes before `start_time` during which a reminder
/// should fire.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSchedule {
    pub id: ScheduleId,
    pub staff_id: AccountId,
    pub student_name: String,
    pub guardian_phone: String,
    pub school_name: Option<String>,
    pub subject: String,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub reminder_enabled: bool,
    pub reminder_time: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a class schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSchedule {
    pub staff_id: AccountId,
    pub student_name: String,
    pub guardian_phone: String,
    pub school_name: Option<String>,
    pub subject: String,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<i32>,
    pub is_active: Option<bool>,
}

/// Partial update payload for a class schedule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleUpdate {
    pub student_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub school_name: Option<String>,
    pub subject: Option<String>,
    pub day_of_week: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<i32>,
    pub is_active: Option<bool>,
}

/// What the reminder scan needs per due schedule: the schedule row joined
/// with the staff member's name and contact phone.
#[derive(Debug, Clone)]
pub struct ReminderCandidate {
    pub schedule_id: ScheduleId,
    pub student_name: String,
    pub guardian_phone: String,
    pub subject: String,
    pub start_time: NaiveTime,
    pub reminder_time: i32,
    pub staff_name: String,
    pub staff_phone: Option<String>,
}
