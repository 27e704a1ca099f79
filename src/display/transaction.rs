//! Transaction display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::Transaction;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format transactions as a table, newest first as given
pub fn transaction_table(transactions: &[Transaction]) -> String {
    let rows = transactions
        .iter()
        .map(|txn| TransactionRow {
            date: txn.created_at.format("%Y-%m-%d").to_string(),
            kind: txn.kind.to_string(),
            amount: txn.amount.to_string(),
            description: txn
                .description
                .as_deref()
                .map(|d| truncate(d, 40))
                .unwrap_or_default(),
            id: txn.id.to_string(),
        })
        .collect();
    render_table(rows, "No transactions found.")
}
