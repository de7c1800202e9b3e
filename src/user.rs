//! Code for creating the user table, registering users and checking their credentials.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash, validation::check_login};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated login name, at least three characters long.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Login(String);

impl Login {
    /// Create a login from `login` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns a [crate::ValidationError::LoginTooShort] if the trimmed login is
    /// shorter than [crate::validation::LOGIN_MIN_LENGTH] characters.
    pub fn new(login: &str) -> Result<Self, Error> {
        let login = login.trim();
        check_login(login)?;

        Ok(Self(login.to_owned()))
    }

    /// Create a login without validation.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the length invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(login: &str) -> Self {
        Self(login.to_owned())
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user of the application.
///
/// The caller should ensure that `id` and `login` are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with.
    pub login: Login,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                login TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateLogin] if another user already has `login`,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn register_user(
    login: Login,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (login, password) VALUES (?1, ?2)",
            (login.as_ref(), password_hash.as_ref()),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateLogin(login.to_string()),
            error => error.into(),
        })?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        login,
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, login, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user from the database with the login `login`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the login.
pub fn get_user_by_login(login: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, login, password FROM user WHERE login = :login")?
        .query_row(&[(":login", &login)], map_row)
        .map_err(|error| error.into())
}

/// Find the user with `login` and check their password.
///
/// # Errors
///
/// Returns:
/// - [Error::InvalidCredentials] if the login is unknown or the password is wrong,
/// - [Error::HashingError] if the stored hash could not be checked,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn authenticate(login: &str, password: &str, connection: &Connection) -> Result<User, Error> {
    let user = match get_user_by_login(login, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    let is_password_valid = user.password_hash.verify(password).map_err(|error| {
        tracing::error!("Error verifying password for {}: {error}", user.login);
        Error::HashingError(error.to_string())
    })?;

    if !is_password_valid {
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_login: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(raw_id),
        login: Login::new_unchecked(&raw_login),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}


#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, Login, PasswordHash};

    use super::{
        UserID, authenticate, create_user_table, get_user_by_id, get_user_by_login, register_user,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = register_user(
            Login::new_unchecked("Pavel"),
            password_hash.clone(),
            &db_connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.login.as_ref(), "Pavel");
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_user_fails_on_duplicate_login() {
        let db_connection = get_db_connection();
        register_user(
            Login::new_unchecked("Pavel"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = register_user(
            Login::new_unchecked("Pavel"),
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateLogin("Pavel".to_owned())));
        assert_eq!(
            get_user_by_login("Pavel", &db_connection).map(|user| user.password_hash),
            Ok(PasswordHash::new_unchecked("hunter2"))
        );
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserID::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let db_connection = get_db_connection();
        let test_user = register_user(
            Login::new_unchecked("Pavel"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_login_succeeds() {
        let db_connection = get_db_connection();
        let test_user = register_user(
            Login::new_unchecked("Pavel"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        assert_eq!(get_user_by_login("Pavel", &db_connection), Ok(test_user));
        assert_eq!(
            get_user_by_login("Ivan", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn authenticate_succeeds_with_correct_password() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::from_raw_password("abcdefgh", 4).unwrap();
        let test_user =
            register_user(Login::new_unchecked("Pavel"), password_hash, &db_connection).unwrap();

        assert_eq!(authenticate("Pavel", "abcdefgh", &db_connection), Ok(test_user));
    }

    #[test]
    fn authenticate_fails_with_wrong_password_or_login() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::from_raw_password("abcdefgh", 4).unwrap();
        register_user(Login::new_unchecked("Pavel"), password_hash, &db_connection).unwrap();

        assert_eq!(
            authenticate("Pavel", "hgfedcba", &db_connection),
            Err(Error::InvalidCredentials)
        );
        assert_eq!(
            authenticate("Ivan", "abcdefgh", &db_connection),
            Err(Error::InvalidCredentials)
        );
    }
}
