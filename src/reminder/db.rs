//! Database operations for reminders.

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    reminder::{NewReminder, Reminder, ReminderId},
    validation::{DATE_FORMAT, TIME_FORMAT},
};

/// Create a reminder and return it with its generated ID.
///
/// The date and time are stored as `YYYY-MM-DD` and `HH:MM`.
pub fn create_reminder(reminder: NewReminder, connection: &Connection) -> Result<Reminder, Error> {
    let date = reminder.date.format(DATE_FORMAT).map_err(format_error)?;
    let time = reminder.time.format(TIME_FORMAT).map_err(format_error)?;

    connection
        .prepare(
            "INSERT INTO reminder (user_id, title, date, time, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, title, date, time, description, notified",
        )?
        .query_row(
            (
                reminder.user_id.as_i64(),
                reminder.title,
                date,
                time,
                reminder.description,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's reminders in the order they were created.
pub fn list_reminders(user_id: UserID, connection: &Connection) -> Result<Vec<Reminder>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, date, time, description, notified
             FROM reminder WHERE user_id = :user_id ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_reminder| maybe_reminder.map_err(|error| error.into()))
        .collect()
}

/// Clear the schedule of a reminder and replace its description with `marker`.
///
/// Returns an error if the reminder doesn't exist.
pub fn update_reminder_expired(
    reminder_id: ReminderId,
    marker: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE reminder SET date = '', time = '', description = ?1 WHERE id = ?2",
        (marker, reminder_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingReminder);
    }

    Ok(())
}

/// Record that the user was told the reminder is due soon.
///
/// Returns an error if the reminder doesn't exist.
pub fn mark_reminder_notified(
    reminder_id: ReminderId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE reminder SET notified = 1 WHERE id = ?1",
        [reminder_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingReminder);
    }

    Ok(())
}

/// Delete the user's reminder(s) matching `title`, `date` and `time`.
///
/// Expired reminders are matched with an empty `date` and `time`.
/// Returns an error if nothing matched.
pub fn delete_reminder(
    user_id: UserID,
    title: &str,
    date: &str,
    time: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM reminder WHERE user_id = ?1 AND title = ?2 AND date = ?3 AND time = ?4",
        (user_id.as_i64(), title, date, time),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingReminder);
    }

    Ok(())
}

/// Initialize the reminder table and indexes.
pub fn create_reminder_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS reminder (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            notified INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_reminder_user_id ON reminder(user_id);",
    )?;

    Ok(())
}

fn format_error(error: time::error::Format) -> Error {
    Error::SqlError(rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
}

fn map_row(row: &Row) -> Result<Reminder, rusqlite::Error> {
    let raw_user_id = row.get(1)?;

    Ok(Reminder {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        title: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        description: row.get(5)?,
        notified: row.get(6)?,
    })
}
