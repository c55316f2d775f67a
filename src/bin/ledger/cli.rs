//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use time::{Date, macros::format_description};

use thu_chi::{
    models::{ActivityKind, PasswordHash, TransactionKind, TransactionStatus},
    query::FilterParams,
};

/// A household ledger for recording income (thu) and expenses (chi).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// File path to the SQLite database.
    #[arg(long, env = "THU_CHI_DB", default_value = "thu_chi.db")]
    pub db_path: PathBuf,

    /// The user to log in as. You will be asked for the password.
    #[arg(long, short, env = "THU_CHI_USER")]
    pub username: Option<String>,

    /// Also write debug logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// The bcrypt cost used when hashing new passwords.
    #[arg(long, default_value_t = PasswordHash::DEFAULT_COST)]
    pub password_cost: u32,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and register the first account.
    Init {
        /// The name of the person who owns the account.
        #[arg(long)]
        display_name: String,
    },
    /// Add, edit, delete and list transactions.
    #[command(subcommand)]
    Transaction(TransactionCommand),
    /// Show totals for the transactions that match a filter.
    Stats(FilterArgs),
    /// Show overall totals and the latest transactions.
    Dashboard,
    /// Add, edit, delete and list transaction types.
    #[command(subcommand)]
    Type(TransactionTypeCommand),
    /// Add, edit, delete and list user accounts.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Show the activity log, newest first.
    History {
        /// Only show actions by this user.
        #[arg(long)]
        user: Option<String>,
        /// Only show actions of this kind (CREATE, UPDATE, DELETE, LOGIN).
        #[arg(long, value_parser = parse_activity_kind)]
        kind: Option<ActivityKind>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    /// Record a new transaction.
    Add {
        /// The amount of money, e.g. 150000 or 12.50.
        #[arg(long)]
        amount: Decimal,
        /// When it happened, formatted as YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        date: Date,
        /// What it was for.
        #[arg(long)]
        description: String,
        /// The ID of the transaction type.
        #[arg(long = "type")]
        type_id: i64,
        /// pending or completed.
        #[arg(long, value_parser = parse_status, default_value = "pending")]
        status: TransactionStatus,
    },
    /// Change some fields of a transaction.
    Edit {
        /// The ID of the transaction.
        id: i64,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        type_id: Option<i64>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TransactionStatus>,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction.
        id: i64,
    },
    /// List the transactions that match a filter.
    List(FilterArgs),
}

#[derive(Subcommand, Debug)]
pub enum TransactionTypeCommand {
    /// Create a transaction type.
    Add {
        name: String,
        /// thu (income) or chi (expense).
        #[arg(long, value_parser = parse_kind)]
        kind: TransactionKind,
    },
    /// Rename a transaction type or change its kind.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_kind)]
        kind: Option<TransactionKind>,
    },
    /// Delete a transaction type. Existing transactions keep their copy.
    Delete { id: i64 },
    /// List transaction types.
    List {
        /// Only list types of this kind.
        #[arg(long, value_parser = parse_kind)]
        kind: Option<TransactionKind>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Create an account. You will be asked for its password.
    Add {
        username: String,
        #[arg(long)]
        display_name: String,
    },
    /// Change the username or display name of an account.
    Edit {
        id: i64,
        #[arg(long = "new-username")]
        new_username: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Change the password of an account, your own by default.
    Passwd {
        /// The username of the account.
        account: Option<String>,
    },
    /// Delete an account.
    Delete { id: i64 },
    /// List accounts.
    List,
}

/// Filter flags. Blank or malformed values are ignored.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Text to look for in descriptions, ignoring case.
    #[arg(long, default_value = "")]
    pub text: String,
    /// The earliest date to include, YYYY-MM-DD.
    #[arg(long, default_value = "")]
    pub from: String,
    /// The latest date to include, YYYY-MM-DD.
    #[arg(long, default_value = "")]
    pub to: String,
    /// The ID of a transaction type.
    #[arg(long = "type", default_value = "")]
    pub type_id: String,
    /// pending or completed.
    #[arg(long, default_value = "")]
    pub status: String,
    /// The smallest amount to include.
    #[arg(long, default_value = "")]
    pub min: String,
    /// The largest amount to include.
    #[arg(long, default_value = "")]
    pub max: String,
}

impl From<FilterArgs> for FilterParams {
    fn from(args: FilterArgs) -> Self {
        FilterParams {
            text_query: args.text,
            date_from: args.from,
            date_to: args.to,
            category_id: args.type_id,
            status: args.status,
            amount_min: args.min,
            amount_max: args.max,
        }
    }
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected a date like 2024-01-31: {error}"))
}

fn parse_kind(raw: &str) -> Result<TransactionKind, String> {
    raw.parse().map_err(|error: thu_chi::Error| error.to_string())
}

fn parse_status(raw: &str) -> Result<TransactionStatus, String> {
    raw.parse().map_err(|error: thu_chi::Error| error.to_string())
}

fn parse_activity_kind(raw: &str) -> Result<ActivityKind, String> {
    raw.parse().map_err(|error: thu_chi::Error| error.to_string())
}
