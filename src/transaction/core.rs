//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, UserID, database_id::DatabaseId};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// The format transaction timestamps are stored in, e.g. "2025-01-15 13:45:00".
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum TransactionKind {
    /// Money earned. Income is credited to the user's savings goals.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Income"),
            TransactionKind::Expense => write!(f, "Expense"),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind \"{other}\"").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are never edited or deleted once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// What the money was for, e.g. "Groceries" or "Salary".
    pub category: String,
    /// The amount of money spent or earned, always greater than zero.
    ///
    /// Whether the money was spent or earned is given by `kind`.
    pub amount: f64,
    /// When the transaction was recorded, in local time.
    pub date: PrimitiveDateTime,
    /// Whether the money was spent or earned.
    pub kind: TransactionKind,
}

/// The data needed to record a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user recording the transaction.
    pub user_id: UserID,
    /// What the money was for.
    pub category: String,
    /// The amount of money, greater than zero.
    pub amount: f64,
    /// When the transaction happened. Sub-second precision is dropped.
    pub date: PrimitiveDateTime,
    /// Whether the money was spent or earned.
    pub kind: TransactionKind,
}

/// Totals over all of a user's transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
}

impl BalanceSummary {
    /// Income minus expenses.
    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Record a new transaction in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if `user_id` does not refer
/// to a registered user or there is some other SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = transaction
        .date
        .format(TIMESTAMP_FORMAT)
        .map_err(|error| {
            Error::SqlError(rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
        })?;

    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, category, amount, date, kind)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, category, amount, date, kind",
        )?
        .query_row(
            (
                transaction.user_id.as_i64(),
                transaction.category,
                transaction.amount,
                date,
                transaction.kind,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's transactions, most recent first.
pub fn get_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, date, kind FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Sum the user's income and expenses.
pub fn get_balance_summary(
    user_id: UserID,
    connection: &Connection,
) -> Result<BalanceSummary, Error> {
    connection
        .prepare(
            "SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount ELSE 0 END), 0)
             FROM \"transaction\" WHERE user_id = :user_id",
        )?
        .query_row(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(BalanceSummary {
                income: row.get(0)?,
                expenses: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

/// Create the transaction table.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_user_id = row.get(1)?;
    let raw_date: String = row.get(4)?;
    let date = PrimitiveDateTime::parse(&raw_date, TIMESTAMP_FORMAT)
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
        })?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        category: row.get(2)?,
        amount: row.get(3)?,
        date,
        kind: row.get(5)?,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{Error, Login, PasswordHash, UserID, db::initialize, register_user};

    use super::{
        BalanceSummary, NewTransaction, TransactionKind, create_transaction,
        get_balance_summary, get_transactions,
    };

    fn get_test_connection() -> (Connection, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = register_user(
            Login::new_unchecked("Pavel"),
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();

        (conn, user.id)
    }

    fn new_transaction(user_id: UserID, amount: f64, kind: TransactionKind) -> NewTransaction {
        NewTransaction {
            user_id,
            category: "Salary".to_owned(),
            amount,
            date: datetime!(2025-01-15 13:45:30.123),
            kind,
        }
    }

    #[test]
    fn create_succeeds_and_drops_subseconds() {
        let (conn, user_id) = get_test_connection();

        let transaction =
            create_transaction(new_transaction(user_id, 300.0, TransactionKind::Income), &conn)
                .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.category, "Salary");
        assert_eq!(transaction.amount, 300.0);
        assert_eq!(transaction.date, datetime!(2025-01-15 13:45:30));
        assert_eq!(transaction.kind, TransactionKind::Income);
    }

    #[test]
    fn create_fails_on_invalid_user() {
        let (conn, _) = get_test_connection();

        let result = create_transaction(
            new_transaction(UserID::new(42), 300.0, TransactionKind::Income),
            &conn,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let (conn, user_id) = get_test_connection();

        let result =
            create_transaction(new_transaction(user_id, -5.0, TransactionKind::Expense), &conn);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_transactions_returns_users_transactions() {
        let (conn, user_id) = get_test_connection();
        let first =
            create_transaction(new_transaction(user_id, 300.0, TransactionKind::Income), &conn)
                .unwrap();
        let mut later = new_transaction(user_id, 50.0, TransactionKind::Expense);
        later.date = datetime!(2025-02-01 09:00);
        let second = create_transaction(later, &conn).unwrap();

        let transactions = get_transactions(user_id, &conn).unwrap();

        assert_eq!(transactions, vec![second, first]);
    }

    #[test]
    fn balance_summary_sums_by_kind() {
        let (conn, user_id) = get_test_connection();
        for (amount, kind) in [
            (1000.0, TransactionKind::Income),
            (250.0, TransactionKind::Income),
            (300.0, TransactionKind::Expense),
        ] {
            create_transaction(new_transaction(user_id, amount, kind), &conn).unwrap();
        }

        let summary = get_balance_summary(user_id, &conn).unwrap();

        assert_eq!(
            summary,
            BalanceSummary {
                income: 1250.0,
                expenses: 300.0
            }
        );
        assert_eq!(summary.balance(), 950.0);
    }

    #[test]
    fn balance_summary_is_zero_without_transactions() {
        let (conn, user_id) = get_test_connection();

        assert_eq!(
            get_balance_summary(user_id, &conn),
            Ok(BalanceSummary::default())
        );
    }
}
