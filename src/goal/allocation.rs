//! Credits income to savings goals.
//!
//! Every active goal receives the *full* income amount. The amount is not split
//! between goals: an income of 300 moves each of three active goals 300 closer
//! to its target.

use serde::{Deserialize, Serialize};

use crate::goal::{Goal, GoalId, GoalStatus};

/// The result of crediting an income amount to a user's goals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalAllocation {
    /// The goals whose amounts changed, with their new state.
    pub updated: Vec<Goal>,
    /// The IDs of the goals that reached their target with this income.
    pub completed: Vec<GoalId>,
}

impl GoalAllocation {
    /// Whether the income changed no goals at all.
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
    }

    /// The updated goals that were completed by this income.
    pub fn completed_goals(&self) -> impl Iterator<Item = &Goal> {
        self.updated
            .iter()
            .filter(|goal| self.completed.contains(&goal.id))
    }
}

/// Credit `amount` to every active goal in `goals`.
///
/// A goal whose new amount reaches its target is clamped to the target and
/// marked [GoalStatus::Completed]. Completed goals are skipped, so a goal
/// completes at most once.
///
/// Amounts that are not finite or not greater than zero change nothing.
pub fn allocate_income(goals: &[Goal], amount: f64) -> GoalAllocation {
    if !amount.is_finite() || amount <= 0.0 {
        tracing::debug!("Ignoring allocation of non-positive amount {amount}");
        return GoalAllocation::default();
    }

    let mut allocation = GoalAllocation::default();

    for goal in goals.iter().filter(|goal| goal.status == GoalStatus::Active) {
        let mut goal = goal.clone();
        let new_amount = goal.current_amount + amount;

        if new_amount >= goal.target_amount {
            goal.current_amount = goal.target_amount;
            goal.status = GoalStatus::Completed;
            allocation.completed.push(goal.id);
        } else {
            goal.current_amount = new_amount;
        }

        allocation.updated.push(goal);
    }

    allocation
}
