//! Summary figures over a set of transactions.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionKind, TransactionStatus};

use super::{FilterSpec, filter};

/// Totals and counts derived from a set of transactions. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// The sum of the amounts of income transactions.
    pub total_income: Decimal,
    /// The sum of the amounts of expense transactions.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub balance: Decimal,
    /// The number of transactions.
    pub transaction_count: usize,
    /// The number of pending transactions.
    pub pending_count: usize,
    /// The number of completed transactions.
    pub completed_count: usize,
}

/// Compute the [Statistics] of `transactions` in a single pass.
///
/// An empty slice gives all zeros. Sums saturate at [Decimal::MAX] instead
/// of overflowing.
pub fn aggregate(transactions: &[Transaction]) -> Statistics {
    let mut statistics = Statistics {
        transaction_count: transactions.len(),
        ..Default::default()
    };

    for transaction in transactions {
        match transaction.category.kind {
            TransactionKind::Income => {
                statistics.total_income =
                    statistics.total_income.saturating_add(transaction.amount)
            }
            TransactionKind::Expense => {
                statistics.total_expense =
                    statistics.total_expense.saturating_add(transaction.amount)
            }
        }

        match transaction.status {
            TransactionStatus::Pending => statistics.pending_count += 1,
            TransactionStatus::Completed => statistics.completed_count += 1,
        }
    }

    statistics.balance = statistics
        .total_income
        .saturating_sub(statistics.total_expense);

    statistics
}

/// The `count` latest transactions, newest first.
///
/// Transactions on the same date keep their relative order.
pub fn recent(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(count);

    sorted
}

/// The transactions selected by a filter and the statistics of just those
/// transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    /// The matching transactions in their original order.
    pub transactions: Vec<Transaction>,
    /// The statistics of `transactions`.
    pub statistics: Statistics,
}

impl TransactionView {
    /// Filter `transactions` with `spec` and aggregate the result.
    pub fn compute(transactions: &[Transaction], spec: &FilterSpec) -> Self {
        let transactions = filter(transactions, spec);
        let statistics = aggregate(&transactions);

        Self {
            transactions,
            statistics,
        }
    }
}
