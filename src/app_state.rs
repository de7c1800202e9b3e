//! Implements a struct that holds the state shared by every operation the UI layer calls.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use time::PrimitiveDateTime;

use crate::{Error, PasswordHash, db::initialize, timezone::local_now};

/// The state of the application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    ///
    /// Used to decide what "today" and "now" are for dates entered by the user.
    pub local_timezone: String,

    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/Moscow".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone is unknown.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;
        local_now(local_timezone)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            password_cost: PasswordHash::DEFAULT_COST,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Set the bcrypt cost for new passwords.
    ///
    /// Lower costs are faster to compute, which is useful in tests.
    pub fn with_password_cost(mut self, password_cost: u32) -> Self {
        self.password_cost = password_cost;
        self
    }

    /// Lock the database connection for the duration of an operation.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if another thread panicked while holding the lock.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }

    /// The current local date and time.
    pub fn now(&self) -> Result<PrimitiveDateTime, Error> {
        local_now(&self.local_timezone)
    }
}


#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use crate::{AppState, Error};

    #[test]
    fn new_initializes_database() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Europe/Moscow").unwrap();

        let table_count: i64 = state
            .connection()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('user', 'transaction', 'goal', 'reminder')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 4);
    }

    #[test]
    fn new_fails_on_unknown_timezone() {
        let result = AppState::new(Connection::open_in_memory().unwrap(), "Not/AZone");

        assert!(matches!(result, Err(Error::InvalidTimezoneError(_))));
    }
}
