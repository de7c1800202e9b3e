//! Finance Helper is a personal finance tracker for a single user.
//!
//! Users register and log in, record income and expense transactions, set
//! savings goals and schedule reminders. This library holds the parts with real
//! logic, and the persistence layer they write through:
//!
//! - [validation]: checks on raw form input, run before any write,
//! - [goal]: savings goals and the engine that credits income to them,
//! - [reminder]: reminders and the scheduler that notifies and expires them.
//!
//! A UI layer drives the library through the form types and the operations
//! re-exported at the crate root, and receives messages for the user through
//! the [Notifier] trait.

#![warn(missing_docs)]

mod alert;
mod app_state;
mod database_id;
mod db;
pub mod goal;
mod log_in;
mod logging;
mod password;
mod register_user;
pub mod reminder;
mod shutdown;
mod timezone;
pub mod transaction;
mod user;
pub mod validation;

pub use alert::{Alert, AlertType, LogNotifier, Notifier, RecordingNotifier};
pub use app_state::AppState;
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use log_in::{LogInForm, log_in};
pub use logging::setup_logging;
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{RegisterForm, register};
pub use shutdown::shutdown_signal;
pub use timezone::{get_local_offset, local_now};
pub use user::{
    Login, User, UserID, authenticate, get_user_by_id, get_user_by_login,
    register_user,
};
pub use validation::ValidationError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user entered something that failed a [validation] check.
    ///
    /// Nothing has been written to the database when this error is returned.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The login is already taken by another user.
    #[error("a user with the login \"{0}\" already exists")]
    DuplicateLogin(String),

    /// The login does not exist or the password does not match.
    ///
    /// The two cases are not distinguished so the caller cannot probe for
    /// registered logins.
    #[error("invalid login or password")]
    InvalidCredentials,

    /// The date or time stored for a reminder could not be parsed.
    #[error("reminder {reminder_id} has an invalid schedule \"{date} {time}\"")]
    InvalidReminderSchedule {
        /// The reminder with the bad schedule.
        reminder_id: DatabaseId,
        /// The stored date string.
        date: String,
        /// The stored time string.
        time: String,
    },

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging. The user should
    /// only be told that something went wrong.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The canonical timezone name did not match a known timezone.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a goal that does not exist.
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a goal that does not exist.
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,

    /// Tried to update a reminder that does not exist.
    #[error("tried to update a reminder that is not in the database")]
    UpdateMissingReminder,

    /// Tried to delete a reminder that does not exist.
    #[error("tried to delete a reminder that is not in the database")]
    DeleteMissingReminder,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Convert the error into a message that can be shown to the user.
    ///
    /// Errors the user can fix are passed through, anything else becomes a
    /// generic message and is logged.
    pub fn into_alert(self) -> Alert {
        match self {
            Error::Validation(error) => {
                Alert::error("Invalid input", &capitalise_first_char(&error.to_string()))
            }
            Error::DuplicateLogin(login) => Alert::error(
                "Login taken",
                &format!("A user with the login \"{login}\" already exists. Choose another login."),
            ),
            Error::InvalidCredentials => Alert::error(
                "Could not log in",
                "Check that the login and password are correct.",
            ),
            Error::NotFound | Error::DeleteMissingGoal | Error::DeleteMissingReminder => {
                Alert::warning(
                    "Nothing selected",
                    "The item could not be found. It may have already been deleted.",
                )
            }
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the logs for more details.",
                )
            }
        }
    }
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
