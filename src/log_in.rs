//! Logging users in from the log-in form.

use serde::{Deserialize, Serialize};

use crate::{AppState, Error, User, user::authenticate};

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInForm {
    /// The user's login.
    pub login: String,
    /// The user's password.
    pub password: String,
}

impl std::fmt::Debug for LogInForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogInForm")
            .field("login", &self.login)
            .field("password", &"********")
            .finish()
    }
}

/// Check the credentials in `form` and return the matching user.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the login is unknown or the password
/// is wrong.
pub fn log_in(state: &AppState, form: LogInForm) -> Result<User, Error> {
    let user = authenticate(form.login.trim(), &form.password, &*state.connection()?)
        .inspect_err(|error| {
            if *error == Error::InvalidCredentials {
                tracing::info!("Failed log-in attempt for \"{}\"", form.login);
            }
        })?;

    tracing::info!("User {} logged in", user.id);

    Ok(user)
}

#[cfg(test)]
mod log_in_tests {
    use crate::{Error, RegisterForm, app_state::test_utils::get_test_app_state, register};

    use super::{LogInForm, log_in};

    fn register_pavel(state: &crate::AppState) {
        register(
            state,
            RegisterForm {
                login: "Pavel".to_owned(),
                password: "hunter2hunter2".to_owned(),
                confirm_password: "hunter2hunter2".to_owned(),
            },
        )
        .unwrap();
    }

    fn form(login: &str, password: &str) -> LogInForm {
        LogInForm {
            login: login.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn logs_in_with_correct_credentials() {
        let state = get_test_app_state();
        register_pavel(&state);

        let user = log_in(&state, form("Pavel", "hunter2hunter2")).unwrap();

        assert_eq!(user.login.as_ref(), "Pavel");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let state = get_test_app_state();
        register_pavel(&state);

        assert_eq!(
            log_in(&state, form("Pavel", "wrong-password")),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn unknown_login_is_rejected() {
        let state = get_test_app_state();
        register_pavel(&state);

        assert_eq!(
            log_in(&state, form("Ivan", "hunter2hunter2")),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn login_registered_with_surrounding_spaces_can_log_in() {
        let state = get_test_app_state();
        let registered = register(
            &state,
            RegisterForm {
                login: " Pavel ".to_owned(),
                password: "hunter2hunter2".to_owned(),
                confirm_password: "hunter2hunter2".to_owned(),
            },
        )
        .unwrap();

        assert_eq!(registered.login.as_ref(), "Pavel");
        assert_eq!(
            log_in(&state, form(" Pavel ", "hunter2hunter2")),
            Ok(registered.clone())
        );
        assert_eq!(log_in(&state, form("Pavel", "hunter2hunter2")), Ok(registered));
    }
}
