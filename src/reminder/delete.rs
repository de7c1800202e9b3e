//! Deleting reminders the user has selected.

use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, UserID, ValidationError,
    reminder::{Reminder, delete_reminder},
};

/// Identifies a reminder the way it is shown in the reminder list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderKey {
    /// The reminder's title.
    pub title: String,
    /// The stored date, empty for expired reminders.
    pub date: String,
    /// The stored time, empty for expired reminders.
    pub time: String,
}

impl From<&Reminder> for ReminderKey {
    fn from(reminder: &Reminder) -> Self {
        Self {
            title: reminder.title.clone(),
            date: reminder.date.clone(),
            time: reminder.time.clone(),
        }
    }
}

/// Delete the user's reminder identified by `key`.
///
/// # Errors
/// Returns:
/// - [Error::Validation] if the title is empty, i.e. nothing was selected,
/// - [Error::DeleteMissingReminder] if the user has no matching reminder.
pub fn remove_reminder(state: &AppState, user_id: UserID, key: ReminderKey) -> Result<(), Error> {
    if key.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle.into());
    }

    delete_reminder(
        user_id,
        &key.title,
        &key.date,
        &key.time,
        &*state.connection()?,
    )?;

    tracing::info!("Deleted reminder \"{}\" for user {user_id}", key.title);

    Ok(())
}
