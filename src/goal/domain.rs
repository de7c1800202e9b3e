//! Core goal domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserID,
    database_id::DatabaseId,
    validation::check_goal_title,
};

/// Database identifier for a goal.
pub type GoalId = DatabaseId;

/// A validated, non-empty goal title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct GoalTitle(String);

impl GoalTitle {
    /// Create a goal title.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an error if `title` is empty or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        check_goal_title(title)?;

        Ok(Self(title.trim().to_owned()))
    }

    /// Create a goal title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_owned())
    }
}

impl AsRef<str> for GoalTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for GoalTitle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalTitle::new(s)
    }
}

impl Display for GoalTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a goal is still collecting money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum GoalStatus {
    /// The current amount is below the target.
    Active,
    /// The target has been reached. The goal takes no further income.
    Completed,
}

impl GoalStatus {
    fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }
}

impl Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "In progress"),
            GoalStatus::Completed => write!(f, "Goal reached!"),
        }
    }
}

impl ToSql for GoalStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for GoalStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(FromSqlError::Other(
                format!("unknown goal status \"{other}\"").into(),
            )),
        }
    }
}

/// A named savings target with accumulated progress and a deadline.
///
/// While the goal is [GoalStatus::Active], `current_amount < target_amount`.
/// Once completed, `current_amount == target_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The user that owns the goal.
    pub user_id: UserID,
    /// What the user is saving for.
    pub title: GoalTitle,
    /// How much money the user wants to save.
    pub target_amount: f64,
    /// How much has been saved so far.
    pub current_amount: f64,
    /// Whether the target has been reached.
    pub status: GoalStatus,
    /// When the goal was created.
    pub creation_date: Date,
    /// When the user wants to reach the target.
    pub target_date: Date,
}

impl Goal {
    /// The fraction of the target saved so far, between 0.0 and 1.0.
    pub fn progress(&self) -> f64 {
        if self.status == GoalStatus::Completed || self.target_amount <= 0.0 {
            return 1.0;
        }

        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }

    /// The number of whole days left until the target date, negative once it has passed.
    pub fn days_remaining(&self, today: Date) -> i64 {
        (self.target_date - today).whole_days()
    }

    /// Whether the target date has passed without the goal being reached.
    pub fn is_overdue(&self, today: Date) -> bool {
        self.status == GoalStatus::Active && self.days_remaining(today) < 0
    }
}

/// The data needed to create a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// The user that owns the goal.
    pub user_id: UserID,
    /// What the user is saving for.
    pub title: GoalTitle,
    /// How much money the user wants to save, greater than zero.
    pub target_amount: f64,
    /// When the goal was created.
    pub creation_date: Date,
    /// When the user wants to reach the target, no earlier than `creation_date`.
    pub target_date: Date,
}


#[cfg(test)]
mod goal_tests {
    use time::macros::date;

    use crate::{
        UserID,
        goal::{Goal, GoalStatus, GoalTitle},
    };

    fn goal(current_amount: f64, target_amount: f64, status: GoalStatus) -> Goal {
        Goal {
            id: 1,
            user_id: UserID::new(1),
            title: GoalTitle::new_unchecked("Bike"),
            target_amount,
            current_amount,
            status,
            creation_date: date!(2025 - 01 - 01),
            target_date: date!(2025 - 03 - 01),
        }
    }

    #[test]
    fn progress_is_fraction_of_target() {
        assert_eq!(goal(250.0, 1000.0, GoalStatus::Active).progress(), 0.25);
    }

    #[test]
    fn progress_is_full_when_completed() {
        assert_eq!(goal(1000.0, 1000.0, GoalStatus::Completed).progress(), 1.0);
    }

    #[test]
    fn days_remaining_counts_down_to_target_date() {
        let goal = goal(0.0, 1000.0, GoalStatus::Active);

        assert_eq!(goal.days_remaining(date!(2025 - 02 - 27)), 2);
        assert_eq!(goal.days_remaining(date!(2025 - 03 - 03)), -2);
    }

    #[test]
    fn only_active_goals_are_overdue() {
        let today = date!(2025 - 03 - 02);

        assert!(goal(0.0, 1000.0, GoalStatus::Active).is_overdue(today));
        assert!(!goal(1000.0, 1000.0, GoalStatus::Completed).is_overdue(today));
        assert!(!goal(0.0, 1000.0, GoalStatus::Active).is_overdue(date!(2025 - 03 - 01)));
    }
}
