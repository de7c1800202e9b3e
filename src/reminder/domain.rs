//! The reminder model.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::{UserID, database_id::DatabaseId};

/// Database identifier for a reminder.
pub type ReminderId = DatabaseId;

/// The description given to a reminder once its time has passed.
pub const EXPIRED_MARKER: &str = "Expired";

/// Something the user asked to be reminded of at a given date and time.
///
/// The date and time are kept as they are stored so that rows that cannot be
/// parsed can be reported and skipped instead of failing a whole query. An
/// expired reminder has an empty date and time and [EXPIRED_MARKER] as its
/// description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// The ID of the reminder.
    pub id: ReminderId,
    /// The user the reminder belongs to.
    pub user_id: UserID,
    /// What to remind the user of.
    pub title: String,
    /// The date as `YYYY-MM-DD`, or empty once expired.
    pub date: String,
    /// The time as `HH:MM`, or empty once expired.
    pub time: String,
    /// Optional extra detail, replaced with [EXPIRED_MARKER] once expired.
    pub description: String,
    /// Whether the user has been told the reminder is due soon.
    pub notified: bool,
}

impl Reminder {
    /// Whether the reminder's time has passed and its schedule was cleared.
    pub fn is_expired(&self) -> bool {
        self.date.is_empty() && self.time.is_empty()
    }
}

impl Display for Reminder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_expired() {
            write!(f, "{} ({})", self.title, self.description)
        } else {
            write!(f, "{} - {} {}", self.title, self.date, self.time)
        }
    }
}

/// The data needed to create a reminder.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    /// The user the reminder belongs to.
    pub user_id: UserID,
    /// What to remind the user of.
    pub title: String,
    /// The day of the reminder.
    pub date: Date,
    /// The time of day of the reminder, to the minute.
    pub time: Time,
    /// Optional extra detail, may be empty.
    pub description: String,
}
