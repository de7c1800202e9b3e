//! Periodic classification of reminders against the current time.
//!
//! A reminder moves through these states:
//!
//! ```text
//! Scheduled -> DueSoon -> Expired -> Cleared
//! ```
//!
//! The user is notified once when a reminder enters the due-soon window, and
//! expired reminders have their schedule cleared so they are not processed
//! again.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, PrimitiveDateTime, Time};

use crate::{
    Alert, Error, Notifier, UserID,
    reminder::{
        EXPIRED_MARKER, Reminder, ReminderId, list_reminders, mark_reminder_notified,
        update_reminder_expired,
    },
    validation::{DATE_FORMAT, TIME_FORMAT},
};

/// How long before a reminder's time the user is notified.
pub const DUE_SOON_WINDOW: Duration = Duration::minutes(30);

/// How often the scheduler checks reminders by default.
pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Where a reminder is relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderStatus {
    /// The reminder's time is more than [DUE_SOON_WINDOW] away.
    Scheduled,
    /// The reminder's time is within the next [DUE_SOON_WINDOW].
    DueSoon,
    /// The reminder's time has passed but its schedule has not been cleared.
    Expired,
    /// The reminder expired and its schedule was cleared.
    Cleared,
}

/// The reminders a single poll acted on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollReport {
    /// Reminders the user was notified about.
    pub notified: Vec<ReminderId>,
    /// Reminders that were expired.
    pub expired: Vec<ReminderId>,
    /// Reminders with a schedule that could not be parsed.
    pub skipped: Vec<ReminderId>,
}

/// Classify `reminder` against `now`.
///
/// # Errors
/// Returns [Error::InvalidReminderSchedule] if the stored date or time cannot be parsed.
pub fn classify_reminder(
    reminder: &Reminder,
    now: PrimitiveDateTime,
) -> Result<ReminderStatus, Error> {
    if reminder.is_expired() {
        return Ok(ReminderStatus::Cleared);
    }

    let instant = reminder_instant(reminder)?;

    let status = if instant < now {
        ReminderStatus::Expired
    } else if instant <= now + DUE_SOON_WINDOW {
        ReminderStatus::DueSoon
    } else {
        ReminderStatus::Scheduled
    };

    Ok(status)
}

/// Check every reminder of `user_id` against `now`.
///
/// Reminders that are due soon and have not been notified yet are sent to
/// `notifier` once. Expired reminders have their schedule cleared. Reminders
/// with a schedule that cannot be parsed are logged and skipped.
///
/// All writes happen in one database transaction, and the notifications are
/// only sent once it has been committed.
///
/// # Errors
/// Returns an error if the reminders could not be read or updated, in which
/// case nothing is written and nobody is notified.
pub fn poll_reminders(
    user_id: UserID,
    now: PrimitiveDateTime,
    connection: &Connection,
    notifier: &dyn Notifier,
) -> Result<PollReport, Error> {
    let transaction = connection.unchecked_transaction()?;
    let mut report = PollReport::default();
    let mut alerts = Vec::new();

    for reminder in list_reminders(user_id, &transaction)? {
        let status = match classify_reminder(&reminder, now) {
            Ok(status) => status,
            Err(error) => {
                tracing::warn!("Skipping reminder: {error}");
                report.skipped.push(reminder.id);
                continue;
            }
        };

        match status {
            ReminderStatus::DueSoon if !reminder.notified => {
                mark_reminder_notified(reminder.id, &transaction)?;
                alerts.push(due_soon_alert(&reminder));
                report.notified.push(reminder.id);
            }
            ReminderStatus::Expired => {
                update_reminder_expired(reminder.id, EXPIRED_MARKER, &transaction)?;
                tracing::info!("Reminder {} \"{}\" expired", reminder.id, reminder.title);
                report.expired.push(reminder.id);
            }
            ReminderStatus::DueSoon | ReminderStatus::Scheduled | ReminderStatus::Cleared => {}
        }
    }

    transaction.commit()?;

    for alert in alerts {
        notifier.notify(alert);
    }

    Ok(report)
}

fn reminder_instant(reminder: &Reminder) -> Result<PrimitiveDateTime, Error> {
    let invalid_schedule = || Error::InvalidReminderSchedule {
        reminder_id: reminder.id,
        date: reminder.date.clone(),
        time: reminder.time.clone(),
    };

    let date = Date::parse(&reminder.date, DATE_FORMAT).map_err(|_| invalid_schedule())?;
    let time = Time::parse(&reminder.time, TIME_FORMAT).map_err(|_| invalid_schedule())?;

    Ok(PrimitiveDateTime::new(date, time))
}

fn due_soon_alert(reminder: &Reminder) -> Alert {
    let details = if reminder.description.is_empty() {
        format!("\"{}\" at {} {}", reminder.title, reminder.date, reminder.time)
    } else {
        format!(
            "\"{}\" at {} {}: {}",
            reminder.title, reminder.date, reminder.time, reminder.description
        )
    };

    Alert::info("Reminder", &details)
}

#[cfg(test)]
mod classify_reminder_tests {
    use time::macros::datetime;

    use crate::{Error, UserID, reminder::Reminder};

    use super::{ReminderStatus, classify_reminder};

    fn reminder(date: &str, time: &str) -> Reminder {
        Reminder {
            id: 7,
            user_id: UserID::new(1),
            title: "Pay rent".to_owned(),
            date: date.to_owned(),
            time: time.to_owned(),
            description: String::new(),
            notified: false,
        }
    }

    #[test]
    fn past_instant_is_expired() {
        let now = datetime!(2025-03-01 12:00);

        assert_eq!(
            classify_reminder(&reminder("2025-02-28", "18:00"), now),
            Ok(ReminderStatus::Expired)
        );
        assert_eq!(
            classify_reminder(&reminder("2025-03-01", "11:59"), now),
            Ok(ReminderStatus::Expired)
        );
    }

    #[test]
    fn instant_within_window_is_due_soon() {
        let now = datetime!(2025-03-01 12:00);

        for time in ["12:00", "12:15", "12:30"] {
            assert_eq!(
                classify_reminder(&reminder("2025-03-01", time), now),
                Ok(ReminderStatus::DueSoon),
                "{time} should be due soon"
            );
        }
    }

    #[test]
    fn instant_after_window_is_scheduled() {
        let now = datetime!(2025-03-01 12:00);

        assert_eq!(
            classify_reminder(&reminder("2025-03-01", "12:31"), now),
            Ok(ReminderStatus::Scheduled)
        );
        assert_eq!(
            classify_reminder(&reminder("2025-03-02", "12:00"), now),
            Ok(ReminderStatus::Scheduled)
        );
    }

    #[test]
    fn window_spans_midnight() {
        let now = datetime!(2025-03-01 23:50);

        assert_eq!(
            classify_reminder(&reminder("2025-03-02", "00:10"), now),
            Ok(ReminderStatus::DueSoon)
        );
    }

    #[test]
    fn empty_schedule_is_cleared() {
        assert_eq!(
            classify_reminder(&reminder("", ""), datetime!(2025-03-01 12:00)),
            Ok(ReminderStatus::Cleared)
        );
    }

    #[test]
    fn malformed_schedule_is_an_error() {
        let now = datetime!(2025-03-01 12:00);

        for (date, time) in [("01.03.2025", "12:00"), ("2025-03-01", "noon"), ("", "12:00")] {
            assert_eq!(
                classify_reminder(&reminder(date, time), now),
                Err(Error::InvalidReminderSchedule {
                    reminder_id: 7,
                    date: date.to_owned(),
                    time: time.to_owned(),
                })
            );
        }
    }
}
