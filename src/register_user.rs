//! Registering new users from the registration form.

use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, Login, PasswordHash, User, ValidatedPassword, user::register_user,
    validation::check_passwords_match,
};

/// The raw data entered by the user in the registration form.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The login the user wants.
    pub login: String,
    /// The password the user wants.
    pub password: String,
    /// The password again, to catch typos.
    pub confirm_password: String,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("login", &self.login)
            .field("password", &"********")
            .field("confirm_password", &"********")
            .finish()
    }
}

/// Validate `form` and register a new user.
///
/// The checks run in the order: login length, password length, passwords match.
///
/// # Errors
/// Returns:
/// - [Error::Validation] if the login or password is invalid,
/// - [Error::DuplicateLogin] if the login is already taken,
/// - [Error::HashingError] if the password could not be hashed.
pub fn register(state: &AppState, form: RegisterForm) -> Result<User, Error> {
    let login = Login::new(&form.login)?;
    let password = ValidatedPassword::new(&form.password)?;
    check_passwords_match(&form.password, &form.confirm_password)?;

    let password_hash = PasswordHash::new(password, state.password_cost)?;

    let user = register_user(login, password_hash, &*state.connection()?)?;

    tracing::info!("Registered user {} \"{}\"", user.id, user.login);

    Ok(user)
}

#[cfg(test)]
mod register_tests {
    use crate::{
        Error, ValidationError, app_state::test_utils::get_test_app_state, authenticate,
    };

    use super::{RegisterForm, register};

    fn form(login: &str, password: &str, confirm_password: &str) -> RegisterForm {
        RegisterForm {
            login: login.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        }
    }

    #[test]
    fn registers_user_with_hashed_password() {
        let state = get_test_app_state();

        let user = register(&state, form("Pavel", "hunter2hunter2", "hunter2hunter2")).unwrap();

        assert_eq!(user.login.as_ref(), "Pavel");
        assert_ne!(user.password_hash.as_ref(), "hunter2hunter2");
        assert_eq!(
            authenticate("Pavel", "hunter2hunter2", &state.connection().unwrap()),
            Ok(user)
        );
    }

    #[test]
    fn rejects_short_login() {
        let state = get_test_app_state();

        assert_eq!(
            register(&state, form("Pb", "hunter2hunter2", "hunter2hunter2")),
            Err(Error::Validation(ValidationError::LoginTooShort))
        );
    }

    #[test]
    fn rejects_short_password() {
        let state = get_test_app_state();

        assert_eq!(
            register(&state, form("Pavel", "hunter2", "hunter2")),
            Err(Error::Validation(ValidationError::PasswordTooShort))
        );
    }

    #[test]
    fn rejects_mismatched_passwords() {
        let state = get_test_app_state();

        assert_eq!(
            register(&state, form("Pavel", "hunter2hunter2", "hunter3hunter3")),
            Err(Error::Validation(ValidationError::PasswordMismatch))
        );
    }

    #[test]
    fn rejects_duplicate_login() {
        let state = get_test_app_state();
        register(&state, form("Pavel", "hunter2hunter2", "hunter2hunter2")).unwrap();

        assert_eq!(
            register(&state, form("Pavel", "something-else", "something-else")),
            Err(Error::DuplicateLogin("Pavel".to_owned()))
        );
    }

    #[test]
    fn debug_output_hides_passwords() {
        let output = format!("{:?}", form("Pavel", "hunter2hunter2", "hunter2hunter2"));

        assert!(!output.contains("hunter2"));
        assert!(output.contains("Pavel"));
    }
}
