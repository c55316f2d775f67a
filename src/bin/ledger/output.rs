//! Renders results as tables or JSON, and reads passwords.

use std::io;

use comfy_table::{Cell, Table, presets::UTF8_FULL};
use serde::Serialize;
use time::{UtcOffset, macros::format_description};

use thu_chi::{
    Dashboard,
    models::{Account, ActivityRecord, Transaction, TransactionType},
    query::{Statistics, TransactionView},
};

/// How results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    /// The offset activity timestamps are shown in.
    pub local_offset: UtcOffset,
}

impl Output {
    /// Print `value` as JSON, or as the table made by `table`.
    pub fn print<T, F>(&self, value: &T, table: F) -> Result<(), serde_json::Error>
    where
        T: Serialize,
        F: FnOnce(&T) -> Table,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", table(value));
        }

        Ok(())
    }

    /// Print a one line confirmation. Nothing is printed in JSON mode except
    /// `value`.
    pub fn done<T: Serialize>(&self, message: &str, value: &T) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{message}");
        }

        Ok(())
    }

    pub fn activity_table(&self, records: &[ActivityRecord]) -> Table {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let rows = records
            .iter()
            .map(|record| {
                let recorded_at = record
                    .recorded_at
                    .to_offset(self.local_offset)
                    .format(format)
                    .unwrap_or_else(|_| record.recorded_at.to_string());

                vec![
                    recorded_at,
                    record.username.clone(),
                    record.kind.to_string(),
                    record.description.clone(),
                ]
            })
            .collect();

        pretty_table(&["Time", "User", "Action", "Description"], rows)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.iter().map(|header| Cell::new(*header)));

    for row in rows {
        table.add_row(row.into_iter().map(Cell::new));
    }

    table
}

pub fn transaction_table(transactions: &[Transaction]) -> Table {
    let rows = transactions
        .iter()
        .map(|transaction| {
            vec![
                transaction.id.to_string(),
                transaction.date.to_string(),
                transaction.weekday_label.clone(),
                transaction.amount.to_string(),
                transaction.description.clone(),
                transaction.status.to_string(),
                transaction.category.name.to_string(),
                transaction.category.kind.code().to_owned(),
            ]
        })
        .collect();

    pretty_table(
        &[
            "ID",
            "Date",
            "Weekday",
            "Amount",
            "Description",
            "Status",
            "Type",
            "Kind",
        ],
        rows,
    )
}

pub fn statistics_table(statistics: &Statistics) -> Table {
    pretty_table(
        &["Income", "Expense", "Balance", "Count", "Pending", "Completed"],
        vec![vec![
            statistics.total_income.to_string(),
            statistics.total_expense.to_string(),
            statistics.balance.to_string(),
            statistics.transaction_count.to_string(),
            statistics.pending_count.to_string(),
            statistics.completed_count.to_string(),
        ]],
    )
}

pub fn view_table(view: &TransactionView) -> Table {
    let mut table = transaction_table(&view.transactions);
    let statistics = &view.statistics;
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Total"),
        Cell::new(""),
        Cell::new(statistics.balance),
        Cell::new(format!(
            "{} in, {} out",
            statistics.total_income, statistics.total_expense
        )),
        Cell::new(format!(
            "{} pending, {} completed",
            statistics.pending_count, statistics.completed_count
        )),
        Cell::new(""),
        Cell::new(""),
    ]);

    table
}

pub fn dashboard_table(dashboard: &Dashboard) -> Table {
    let mut table = statistics_table(&dashboard.statistics);
    table.add_row(vec![Cell::new("Latest transactions")]);

    for transaction in &dashboard.recent_transactions {
        table.add_row(vec![
            Cell::new(transaction.date),
            Cell::new(transaction.amount),
            Cell::new(transaction.category.kind.code()),
            Cell::new(&transaction.description),
            Cell::new(transaction.status),
            Cell::new(&transaction.category.name),
        ]);
    }

    table
}

pub fn transaction_type_table(transaction_types: &[TransactionType]) -> Table {
    let rows = transaction_types
        .iter()
        .map(|transaction_type| {
            vec![
                transaction_type.id.to_string(),
                transaction_type.name.to_string(),
                transaction_type.kind.code().to_owned(),
            ]
        })
        .collect();

    pretty_table(&["ID", "Name", "Kind"], rows)
}

pub fn account_table(accounts: &[Account]) -> Table {
    let rows = accounts
        .iter()
        .map(|account| {
            vec![
                account.id.to_string(),
                account.username.to_string(),
                account.display_name.clone(),
            ]
        })
        .collect();

    pretty_table(&["ID", "Username", "Name"], rows)
}

/// Ask for a password without echoing it.
///
/// Returns `None` if stdin is closed.
pub fn prompt_password(prompt: &str) -> io::Result<Option<String>> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Ok(Some(password)),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => Err(error),
    }
}

/// Ask for a new password twice until both entries match.
pub fn prompt_new_password() -> io::Result<Option<String>> {
    loop {
        let Some(first_password) = prompt_password("Enter a new password: ")? else {
            return Ok(None);
        };
        let Some(second_password) = prompt_password("Enter the same password again: ")? else {
            return Ok(None);
        };

        if first_password == second_password {
            return Ok(Some(first_password));
        }

        print_error("Passwords must match, try again.");
    }
}

pub fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
