//! Recording transactions from the "add transaction" form.

use serde::{Deserialize, Serialize};

use crate::{
    Alert, AppState, Error, Notifier, UserID,
    goal::credit_income,
    transaction::{NewTransaction, Transaction, TransactionKind, create_transaction},
    validation::{check_transaction_amount, check_transaction_category},
};

/// The raw data entered by the user in the "add transaction" form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Whether the money was spent or earned.
    pub kind: TransactionKind,
    /// The category, one of the preset expense categories for expenses.
    pub category: String,
    /// The amount, a positive whole number.
    pub amount: String,
}

/// Validate `form` and record a transaction for `user_id` dated now.
///
/// Income is credited to every active goal of the user in the same database
/// transaction as the insert, so either both are written or neither is. The
/// user is told about the new transaction, any goals the income completed, and
/// when an income had no goals to go towards.
///
/// # Errors
/// Returns an [Error::Validation] if the category or amount is invalid, in
/// which case nothing is written and `notifier` is not called.
pub fn add_transaction(
    state: &AppState,
    user_id: UserID,
    form: TransactionForm,
    notifier: &dyn Notifier,
) -> Result<Transaction, Error> {
    let category = check_transaction_category(form.kind, &form.category)?;
    let amount = check_transaction_amount(&form.amount)?;
    let now = state.now()?;

    let connection = state.connection()?;
    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = create_transaction(
        NewTransaction {
            user_id,
            category,
            amount,
            date: now,
            kind: form.kind,
        },
        &sql_transaction,
    )?;

    let allocation = match transaction.kind {
        TransactionKind::Income => Some(credit_income(user_id, amount, &sql_transaction)?),
        TransactionKind::Expense => None,
    };

    sql_transaction.commit()?;

    tracing::info!(
        "Recorded {} transaction {} of {} for user {user_id}",
        transaction.kind,
        transaction.id,
        transaction.amount
    );

    if let Some(allocation) = allocation {
        if allocation.is_empty() {
            notifier.notify(Alert::info(
                "No active goals",
                "Add a goal to start saving towards it.",
            ));
        }

        for goal in allocation.completed_goals() {
            notifier.notify(Alert::success(
                "Goal reached",
                &format!("You have saved {} for \"{}\".", goal.target_amount, goal.title),
            ));
        }
    }

    notifier.notify(Alert::success(
        "Transaction added",
        &format!(
            "{} of {} in {}.",
            transaction.kind, transaction.amount, transaction.category
        ),
    ));

    Ok(transaction)
}
