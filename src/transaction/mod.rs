//! Income and expense transactions.

mod core;
mod create;

pub use core::{
    BalanceSummary, NewTransaction, TIMESTAMP_FORMAT, Transaction, TransactionId,
    TransactionKind, create_transaction, create_transaction_table, get_balance_summary,
    get_transactions, map_transaction_row,
};
pub use create::{TransactionForm, add_transaction};
