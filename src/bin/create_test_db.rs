use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::Duration;

use finance_helper::{
    AppState, LogNotifier, RegisterForm,
    goal::{GoalForm, add_goal},
    register,
    reminder::{ReminderForm, add_reminder},
    transaction::{TransactionForm, TransactionKind, add_transaction},
    validation::{DATE_FORMAT, TIME_FORMAT},
};

/// A utility for creating a test database for finance_helper.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The canonical name of the local timezone, e.g. "Europe/Moscow".
    #[arg(long, default_value = "Europe/Moscow")]
    timezone: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let state = AppState::new(conn, &args.timezone)?;

    println!("Creating test user \"test\" with the password \"test1234\"...");
    let user = register(
        &state,
        RegisterForm {
            login: "test".to_owned(),
            password: "test1234".to_owned(),
            confirm_password: "test1234".to_owned(),
        },
    )?;

    let now = state.now()?;
    let in_three_months = (now + Duration::days(90)).date().format(DATE_FORMAT)?;

    println!("Creating goals...");
    for (title, amount) in [("New bike", "30000"), ("Holiday", "120000")] {
        add_goal(
            &state,
            user.id,
            GoalForm {
                title: title.to_owned(),
                amount: amount.to_owned(),
                target_date: in_three_months.clone(),
            },
        )?;
    }

    println!("Creating transactions...");
    for (kind, category, amount) in [
        (TransactionKind::Income, "Salary", "50000"),
        (TransactionKind::Expense, "Groceries", "4500"),
        (TransactionKind::Expense, "Taxi", "800"),
    ] {
        add_transaction(
            &state,
            user.id,
            TransactionForm {
                kind,
                category: category.to_owned(),
                amount: amount.to_owned(),
            },
            &LogNotifier,
        )?;
    }

    println!("Creating reminders...");
    for (title, offset) in [
        ("Call the bank", Duration::minutes(20)),
        ("Pay rent", Duration::days(1)),
    ] {
        let at = now + offset;

        add_reminder(
            &state,
            user.id,
            ReminderForm {
                title: title.to_owned(),
                date: at.date().format(DATE_FORMAT)?,
                time: at.time().format(TIME_FORMAT)?,
                description: String::new(),
            },
        )?;
    }

    println!("Success! The test user has the ID {}.", user.id);

    Ok(())
}
