//! Savings goals and the engine that credits income to them.

mod allocation;
mod create;
mod db;
mod delete;
mod domain;

pub use allocation::{GoalAllocation, allocate_income};
pub use create::{GoalForm, add_goal};
pub(crate) use db::credit_income;
pub use db::{
    apply_income, create_goal, create_goal_table, delete_goal, delete_goal_by_id, get_goal,
    list_goals, update_goal,
};
pub use delete::remove_goal;
pub use domain::{Goal, GoalId, GoalStatus, GoalTitle, NewGoal};
