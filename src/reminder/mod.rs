//! Reminders and the scheduler that notifies and expires them.

mod create;
mod db;
mod delete;
mod domain;
mod scheduler;

pub use create::{ReminderForm, add_reminder};
pub use db::{
    create_reminder, create_reminder_table, delete_reminder, list_reminders,
    mark_reminder_notified, update_reminder_expired,
};
pub use delete::{ReminderKey, remove_reminder};
pub use domain::{EXPIRED_MARKER, NewReminder, Reminder, ReminderId};
pub use scheduler::{
    DUE_SOON_WINDOW, POLL_INTERVAL, PollReport, ReminderStatus, classify_reminder,
    poll_reminders,
};
