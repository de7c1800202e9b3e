use std::{error::Error, path::PathBuf, process::exit, time::Duration};

use clap::Parser;
use rusqlite::Connection;
use tokio::time::MissedTickBehavior;

use finance_helper::{
    AppState, LogNotifier, UserID, get_user_by_id,
    reminder::{POLL_INTERVAL, PollReport, poll_reminders},
    setup_logging, shutdown_signal,
};

/// Checks a user's reminders on a timer, notifying them of reminders that are
/// due soon and expiring those that have passed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The ID of the user whose reminders should be checked.
    #[arg(long)]
    user_id: i64,

    /// The canonical name of the local timezone, e.g. "Europe/Moscow".
    #[arg(long, default_value = "Europe/Moscow")]
    timezone: String,

    /// How many seconds to wait between checks.
    #[arg(long, default_value_t = POLL_INTERVAL.as_secs())]
    poll_interval_secs: u64,

    /// Also write debug logs to this file.
    #[arg(long)]
    debug_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.debug_log.as_deref())?;

    let conn = Connection::open(&args.db_path)?;
    let state = AppState::new(conn, &args.timezone)?;
    let user_id = UserID::new(args.user_id);

    let user = match get_user_by_id(user_id, &*state.connection()?) {
        Ok(user) => user,
        Err(finance_helper::Error::NotFound) => {
            eprintln!("There is no user with the ID {user_id} in {}.", args.db_path);
            exit(1);
        }
        Err(error) => return Err(error.into()),
    };

    let mut interval = tokio::time::interval(Duration::from_secs(args.poll_interval_secs.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tracing::info!(
        "Checking reminders for {} (ID {user_id}) every {}s",
        user.login,
        args.poll_interval_secs.max(1)
    );

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Stopping reminder scheduler.");
                break;
            }
            _ = interval.tick() => {
                match poll_once(&state, user_id) {
                    Ok(report) if report != PollReport::default() => {
                        tracing::debug!("Poll report: {report:?}");
                    }
                    Ok(_) => {}
                    Err(error) => tracing::error!("Could not check reminders: {error}"),
                }
            }
        }
    }

    Ok(())
}

fn poll_once(state: &AppState, user_id: UserID) -> Result<PollReport, finance_helper::Error> {
    let now = state.now()?;

    poll_reminders(user_id, now, &*state.connection()?, &LogNotifier)
}
