//! Database operations for goals.

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    goal::{Goal, GoalAllocation, GoalId, GoalStatus, GoalTitle, NewGoal, allocate_income},
};

/// Create a goal and return it with its generated ID.
///
/// New goals start with nothing saved.
pub fn create_goal(goal: NewGoal, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(
            "INSERT INTO goal (user_id, title, target_amount, current_amount, status, creation_date, target_date)
             VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6)
             RETURNING id, user_id, title, target_amount, current_amount, status, creation_date, target_date",
        )?
        .query_row(
            (
                goal.user_id.as_i64(),
                goal.title.as_ref(),
                goal.target_amount,
                GoalStatus::Active,
                goal.creation_date,
                goal.target_date,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single goal by ID.
pub fn get_goal(goal_id: GoalId, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, target_amount, current_amount, status, creation_date, target_date
             FROM goal WHERE id = :id;",
        )?
        .query_row(&[(":id", &goal_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all of a user's goals in the order they were created.
pub fn list_goals(user_id: UserID, connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, target_amount, current_amount, status, creation_date, target_date
             FROM goal WHERE user_id = :user_id ORDER BY id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Set the saved amount and status of a goal. Returns an error if the goal doesn't exist.
pub fn update_goal(
    goal_id: GoalId,
    current_amount: f64,
    status: GoalStatus,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET current_amount = ?1, status = ?2 WHERE id = ?3",
        (current_amount, status, goal_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Delete the user's goal(s) with the title `title`.
///
/// Returns an error if the user has no goal with that title.
pub fn delete_goal(
    user_id: UserID,
    title: &GoalTitle,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM goal WHERE user_id = ?1 AND title = ?2",
        (user_id.as_i64(), title.as_ref()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

/// Delete a goal by ID. Returns an error if the goal doesn't exist.
pub fn delete_goal_by_id(goal_id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM goal WHERE id = ?1", [goal_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

/// Credit an income `amount` to all of the user's active goals.
///
/// All goal updates are written in a single transaction: either every goal is
/// updated or none are.
///
/// # Errors
/// Returns [Error::SqlError] if reading or writing the goals fails, in which
/// case no goal has been changed.
pub fn apply_income(
    user_id: UserID,
    amount: f64,
    connection: &Connection,
) -> Result<GoalAllocation, Error> {
    let transaction = connection.unchecked_transaction()?;

    let allocation = credit_income(user_id, amount, &transaction)?;

    transaction.commit()?;

    Ok(allocation)
}

/// Credit an income to the user's goals without starting a transaction.
///
/// The caller is responsible for running this inside a transaction.
pub(crate) fn credit_income(
    user_id: UserID,
    amount: f64,
    connection: &Connection,
) -> Result<GoalAllocation, Error> {
    let goals = list_goals(user_id, connection)?;
    let allocation = allocate_income(&goals, amount);

    for goal in &allocation.updated {
        tracing::debug!(
            "Goal {} \"{}\" now at {}/{}",
            goal.id,
            goal.title,
            goal.current_amount,
            goal.target_amount
        );
        update_goal(goal.id, goal.current_amount, goal.status, connection)?;
    }

    for goal in allocation.completed_goals() {
        tracing::info!("Goal {} \"{}\" reached its target", goal.id, goal.title);
    }

    Ok(allocation)
}

/// Initialize the goal table and indexes.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            target_amount REAL NOT NULL CHECK (target_amount > 0),
            current_amount REAL NOT NULL DEFAULT 0 CHECK (current_amount >= 0),
            status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'completed')),
            creation_date TEXT NOT NULL,
            target_date TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_goal_user_id ON goal(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let raw_user_id = row.get(1)?;
    let raw_title: String = row.get(2)?;

    Ok(Goal {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        title: GoalTitle::new_unchecked(&raw_title),
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        status: row.get(5)?,
        creation_date: row.get(6)?,
        target_date: row.get(7)?,
    })
}
