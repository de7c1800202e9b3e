//! Boundary checks for raw form input.
//!
//! Every function here takes the string exactly as the user typed it and either
//! returns the parsed value or a [ValidationError] describing what is wrong.
//! The checks have no side effects, so they can be run any number of times on
//! the same input and give the same verdict. Callers must run them before
//! writing anything to the database.

use time::{Date, Time, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::transaction::TransactionKind;

/// The format for dates entered by the user and stored in the database, e.g. "2025-12-31".
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The 24-hour format for reminder times, e.g. "09:30".
pub const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// The minimum number of characters in a login.
pub const LOGIN_MIN_LENGTH: usize = 3;

/// The minimum number of characters in a password.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Characters that may never appear in a transaction amount.
pub const FORBIDDEN_AMOUNT_SYMBOLS: [char; 4] = ['$', '+', '*', '|'];

/// The preset categories an expense can be filed under.
///
/// Income categories are free text.
pub const EXPENSE_CATEGORIES: [&str; 3] = ["Groceries", "Clothing", "Taxi"];

/// The reasons user input can be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The login has fewer than [LOGIN_MIN_LENGTH] characters.
    #[error("login must be at least {LOGIN_MIN_LENGTH} characters long")]
    LoginTooShort,

    /// The password has fewer than [PASSWORD_MIN_LENGTH] characters.
    #[error("password must be at least {PASSWORD_MIN_LENGTH} characters long")]
    PasswordTooShort,

    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A goal title was empty or only whitespace.
    #[error("title cannot be empty")]
    EmptyTitle,

    /// An amount field was left empty.
    #[error("amount cannot be empty")]
    EmptyAmount,

    /// An amount was a number, but zero or negative.
    #[error("amount must be greater than zero")]
    AmountNotPositive,

    /// An amount contained something other than digits.
    #[error("amount must be a whole number, got \"{0}\"")]
    AmountNotNumeric(String),

    /// An amount contained one of [FORBIDDEN_AMOUNT_SYMBOLS].
    #[error("amount cannot contain the symbol '{0}'")]
    ForbiddenSymbol(char),

    /// A transaction was submitted without a category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// An expense used a category outside of [EXPENSE_CATEGORIES].
    #[error("\"{0}\" is not an expense category")]
    UnknownExpenseCategory(String),

    /// A date field was left empty.
    #[error("date cannot be empty")]
    EmptyDate,

    /// A date did not match [DATE_FORMAT].
    #[error("invalid date \"{0}\", expected the format YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// A date was before today.
    #[error("{0} is in the past")]
    DateInPast(Date),

    /// A time did not match [TIME_FORMAT].
    #[error("invalid time \"{0}\", expected the format HH:MM")]
    InvalidTimeFormat(String),

    /// A free-text field was empty.
    #[error("text cannot be empty")]
    EmptyText,

    /// A free-text field contained a character outside the allowed set.
    #[error("text cannot contain the character '{0}'")]
    InvalidCharacter(char),
}

/// Check that a login is long enough.
pub fn check_login(login: &str) -> Result<(), ValidationError> {
    if login.graphemes(true).count() < LOGIN_MIN_LENGTH {
        return Err(ValidationError::LoginTooShort);
    }

    Ok(())
}

/// Check that a raw password is long enough.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.graphemes(true).count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Check that the password was typed the same way twice.
pub fn check_passwords_match(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

/// Check that a goal title has some non-whitespace content.
pub fn check_goal_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    Ok(())
}

/// Parse the target amount of a goal.
///
/// The amount must be a positive whole number written with digits only.
pub fn check_goal_amount(raw_amount: &str) -> Result<f64, ValidationError> {
    let raw_amount = raw_amount.trim();

    if raw_amount.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }

    parse_positive_whole_number(raw_amount)
}

/// Parse the target date of a goal.
///
/// Only the format is checked here, use [check_date] to also reject past dates.
pub fn check_goal_date(raw_date: &str) -> Result<Date, ValidationError> {
    let raw_date = raw_date.trim();

    if raw_date.is_empty() {
        return Err(ValidationError::EmptyDate);
    }

    parse_date(raw_date)
}

/// Check that a transaction amount was entered at all.
pub fn check_transaction_amount_present(raw_amount: &str) -> Result<(), ValidationError> {
    if raw_amount.trim().is_empty() {
        return Err(ValidationError::EmptyAmount);
    }

    Ok(())
}

/// Parse a transaction amount that must be a positive whole number.
pub fn check_transaction_amount_is_number(raw_amount: &str) -> Result<f64, ValidationError> {
    parse_positive_whole_number(raw_amount.trim())
}

/// Reject transaction amounts containing currency or operator symbols.
pub fn check_transaction_amount_symbols(raw_amount: &str) -> Result<(), ValidationError> {
    match raw_amount
        .chars()
        .find(|c| FORBIDDEN_AMOUNT_SYMBOLS.contains(c))
    {
        Some(symbol) => Err(ValidationError::ForbiddenSymbol(symbol)),
        None => Ok(()),
    }
}

/// Run every transaction amount check and return the parsed amount.
///
/// The checks run in the order: present, symbols, number, so the user gets the
/// most specific message.
pub fn check_transaction_amount(raw_amount: &str) -> Result<f64, ValidationError> {
    check_transaction_amount_present(raw_amount)?;
    check_transaction_amount_symbols(raw_amount)?;
    check_transaction_amount_is_number(raw_amount)
}

/// Check the category of a transaction and return it trimmed.
pub fn check_transaction_category(
    kind: TransactionKind,
    raw_category: &str,
) -> Result<String, ValidationError> {
    let category = raw_category.trim();

    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }

    if kind == TransactionKind::Expense && !EXPENSE_CATEGORIES.contains(&category) {
        return Err(ValidationError::UnknownExpenseCategory(category.to_owned()));
    }

    Ok(category.to_owned())
}

/// Parse a date that must be today or later.
pub fn check_date(raw_date: &str, today: Date) -> Result<Date, ValidationError> {
    let date = parse_date(raw_date.trim())?;

    if date < today {
        return Err(ValidationError::DateInPast(date));
    }

    Ok(date)
}

/// Parse a 24-hour `HH:MM` time.
pub fn check_time(raw_time: &str) -> Result<Time, ValidationError> {
    let raw_time = raw_time.trim();

    Time::parse(raw_time, TIME_FORMAT)
        .map_err(|_| ValidationError::InvalidTimeFormat(raw_time.to_owned()))
}

/// Check a title or description against the allowed character set.
///
/// Latin and Cyrillic letters, digits, spaces and `- . , ! ?` are allowed.
pub fn check_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    match text.chars().find(|&c| !is_allowed_text_char(c)) {
        Some(c) => Err(ValidationError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

fn is_allowed_text_char(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '0'..='9' | 'а'..='я' | 'А'..='Я')
        || matches!(c, ' ' | '-' | '.' | ',' | '!' | '?')
}

fn parse_date(raw_date: &str) -> Result<Date, ValidationError> {
    Date::parse(raw_date, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateFormat(raw_date.to_owned()))
}

fn parse_positive_whole_number(raw_amount: &str) -> Result<f64, ValidationError> {
    let is_all_digits = !raw_amount.is_empty() && raw_amount.chars().all(|c| c.is_ascii_digit());

    if !is_all_digits {
        // Give a better message for things like "-500" than "not a number".
        return match raw_amount.parse::<f64>() {
            Ok(amount) if amount <= 0.0 => Err(ValidationError::AmountNotPositive),
            _ => Err(ValidationError::AmountNotNumeric(raw_amount.to_owned())),
        };
    }

    match raw_amount.parse::<f64>() {
        Ok(amount) if !amount.is_finite() => {
            Err(ValidationError::AmountNotNumeric(raw_amount.to_owned()))
        }
        Ok(amount) if amount <= 0.0 => Err(ValidationError::AmountNotPositive),
        Ok(amount) => Ok(amount),
        Err(_) => Err(ValidationError::AmountNotNumeric(raw_amount.to_owned())),
    }
}
