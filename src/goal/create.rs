//! Creating goals from the "add goal" form.

use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, UserID,
    goal::{Goal, GoalTitle, NewGoal, create_goal},
    validation::{ValidationError, check_goal_amount, check_goal_date},
};

/// The raw data entered by the user in the "add goal" form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalForm {
    /// What the user is saving for.
    pub title: String,
    /// The target amount, a positive whole number.
    pub amount: String,
    /// The target date as `YYYY-MM-DD`.
    pub target_date: String,
}

/// Validate `form` and create a goal for `user_id`.
///
/// The goal's creation date is today in the local timezone, and the target
/// date may not be before it.
///
/// # Errors
/// Returns an [Error::Validation] if any field is invalid, in which case
/// nothing is written.
pub fn add_goal(state: &AppState, user_id: UserID, form: GoalForm) -> Result<Goal, Error> {
    let title = GoalTitle::new(&form.title)?;
    let target_amount = check_goal_amount(&form.amount)?;
    let target_date = check_goal_date(&form.target_date)?;

    let today = state.now()?.date();
    if target_date < today {
        return Err(ValidationError::DateInPast(target_date).into());
    }

    let goal = create_goal(
        NewGoal {
            user_id,
            title,
            target_amount,
            creation_date: today,
            target_date,
        },
        &*state.connection()?,
    )?;

    tracing::info!("Created goal {} \"{}\" for user {user_id}", goal.id, goal.title);

    Ok(goal)
}
