//! Deleting goals the user has selected.

use crate::{
    AppState, Error, UserID,
    goal::{GoalTitle, delete_goal},
};

/// Delete the user's goal with the title `title`.
///
/// # Errors
/// Returns:
/// - [Error::Validation] if `title` is empty, i.e. nothing was selected,
/// - [Error::DeleteMissingGoal] if the user has no goal with that title.
pub fn remove_goal(state: &AppState, user_id: UserID, title: &str) -> Result<(), Error> {
    let title = GoalTitle::new(title)?;

    delete_goal(user_id, &title, &*state.connection()?)?;

    tracing::info!("Deleted goal \"{title}\" for user {user_id}");

    Ok(())
}
