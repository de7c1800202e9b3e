//! Creating reminders from the "add reminder" form.

use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, UserID,
    reminder::{NewReminder, Reminder, create_reminder},
    validation::{check_date, check_text, check_time},
};

/// The raw data entered by the user in the "add reminder" form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderForm {
    /// What to remind the user of.
    pub title: String,
    /// The date as `YYYY-MM-DD`, today or later.
    pub date: String,
    /// The time as 24-hour `HH:MM`.
    pub time: String,
    /// Optional extra detail, may be left empty.
    pub description: String,
}

/// Validate `form` and create a reminder for `user_id`.
///
/// The title and a non-empty description may only contain letters, digits,
/// spaces and `- . , ! ?`.
///
/// # Errors
/// Returns an [Error::Validation] if any field is invalid, in which case
/// nothing is written.
pub fn add_reminder(
    state: &AppState,
    user_id: UserID,
    form: ReminderForm,
) -> Result<Reminder, Error> {
    let title = form.title.trim();
    check_text(title)?;

    let today = state.now()?.date();
    let date = check_date(&form.date, today)?;
    let time = check_time(&form.time)?;

    let description = form.description.trim();
    if !description.is_empty() {
        check_text(description)?;
    }

    let reminder = create_reminder(
        NewReminder {
            user_id,
            title: title.to_owned(),
            date,
            time,
            description: description.to_owned(),
        },
        &*state.connection()?,
    )?;

    tracing::info!(
        "Created reminder {} \"{}\" for user {user_id}",
        reminder.id,
        reminder.title
    );

    Ok(reminder)
}
